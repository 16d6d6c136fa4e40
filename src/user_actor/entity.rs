use crate::actor_framework::Entity;
use crate::domain::{User, UserPatch};
use crate::store::keys;

impl Entity for User {
    type Key = String;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    const COLLECTION: &'static str = keys::USERS;

    fn key(&self) -> &String {
        &self.run
    }

    fn on_create(&mut self) -> Result<(), String> {
        if self.run.trim().is_empty() {
            return Err("RUN is required".to_string());
        }
        self.run = self.run.trim().to_string();
        self.email = self.email.trim().to_string();
        Ok(())
    }

    /// Updates profile fields. The RUN never changes.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(surnames) = patch.surnames {
            self.surnames = surnames;
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.filter(|p| !p.trim().is_empty());
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(birthdate) = patch.birthdate {
            self.birthdate = Some(birthdate);
        }
        if let Some(user_type) = patch.user_type {
            self.user_type = user_type;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(discount) = patch.discount {
            self.discount = discount;
        }
        Ok(())
    }

    /// Admin accounts are never deleted.
    fn on_delete(&self) -> Result<(), String> {
        if self.is_admin() {
            Err(format!("user {} is an administrator", self.run))
        } else {
            Ok(())
        }
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
