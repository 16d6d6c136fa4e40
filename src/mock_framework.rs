//! # Mock Framework
//!
//! Utilities for testing clients and the services built on them without a
//! running [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! mailbox, then script replies with the `expect_*` helpers. Each helper
//! returns `None` when the next request is of a different kind, so the
//! order of calls made by the code under test is asserted as well.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};

pub type MockReceiver<T> = mpsc::Receiver<ResourceRequest<T>>;

pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, MockReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

pub async fn expect_get<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::Key, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

pub async fn expect_list<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<Response<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_find<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(Filter<T>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Find { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

pub async fn expect_create<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

pub async fn expect_action<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Key, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            key,
            action,
            respond_to,
        }) => Some((key, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::clients::{ProductClient, UserClient};
    use crate::domain::{Product, User};
    use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
    use crate::user_actor::UserError;

    #[tokio::test]
    async fn test_add_reports_duplicate_as_domain_error() {
        let (inner, mut receiver) = create_mock_client::<User>(4);
        let users = UserClient::new(inner);

        let task = tokio::spawn(async move {
            users
                .add_user(User::new("12345678", "Ana", "Rojas", "ana@gmail.com"))
                .await
        });

        let (entity, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(entity.run, "12345678");
        responder
            .send(Err(FrameworkError::DuplicateKey("12345678".into())))
            .unwrap();

        assert_eq!(task.await.unwrap(), Err(UserError::AlreadyExists("12345678".into())));
    }

    #[tokio::test]
    async fn test_find_by_email_sends_a_case_insensitive_filter() {
        let (inner, mut receiver) = create_mock_client::<User>(4);
        let users = UserClient::new(inner);

        let task = tokio::spawn(async move { users.find_by_email("ANA@Gmail.com".into()).await });

        let (filter, responder) = expect_find(&mut receiver).await.expect("Expected Find request");
        let ana = User::new("12345678", "Ana", "Rojas", "ana@gmail.com");
        assert!(filter(&ana));
        assert!(!filter(&User::new("7654321", "Luis", "Soto", "luis@gmail.com")));
        responder.send(Ok(vec![ana.clone()])).unwrap();

        assert_eq!(task.await.unwrap(), Ok(Some(ana)));
    }

    #[tokio::test]
    async fn test_decrement_shortfall_maps_to_insufficient_stock() {
        let (inner, mut receiver) = create_mock_client::<Product>(4);
        let products = ProductClient::new(inner);

        let task = tokio::spawn(async move { products.decrement_stock("A1".into(), 4).await });

        let (key, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(key, "A1");
        assert!(matches!(action, ProductAction::DecrementStock(4)));
        responder
            .send(Ok(ProductActionResult::Insufficient { available: 3 }))
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(ProductError::InsufficientStock {
                code: "A1".into(),
                requested: 4,
                available: 3,
            })
        );
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_communication_error() {
        let (inner, mut receiver) = create_mock_client::<Product>(4);
        let products = ProductClient::new(inner);

        let task = tokio::spawn(async move { products.get_product("A1".into()).await });
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        assert!(matches!(
            task.await.unwrap(),
            Err(ProductError::ActorCommunicationError(_))
        ));
    }
}
