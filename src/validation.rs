//! Registration form validation.
//!
//! Every validator is pure and returns `None` for a valid value or the
//! message to show next to the offending field.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Address, UserType};

/// Domains accepted for any account.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 4] = ["duoc.cl", "duocuc.cl", "profesor.duoc.cl", "gmail.com"];

/// Domains that earn the academic discount at registration.
pub const ACADEMIC_EMAIL_DOMAINS: [&str; 3] = ["duoc.cl", "duocuc.cl", "profesor.duoc.cl"];

pub const MINIMUM_AGE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Run,
    Name,
    Surnames,
    Email,
    Phone,
    Birthdate,
    Street,
    Commune,
    Region,
    Password,
    PasswordConfirmation,
    Terms,
}

/// Which form is being validated. The rules differ in password length,
/// address length and whether terms must be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// An administrator creating an account.
    Admin,
    SelfRegistration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub run: String,
    pub name: String,
    pub surnames: String,
    pub email: String,
    pub phone: String,
    pub birthdate: Option<NaiveDate>,
    pub street: String,
    pub commune: String,
    pub region: String,
    pub password: String,
    pub password_confirmation: String,
    pub accepted_terms: bool,
    /// Only honored in the admin flow.
    pub user_type: UserType,
}

impl RegistrationForm {
    pub fn address(&self) -> Address {
        Address {
            street: self.street.trim().to_string(),
            commune: self.commune.trim().to_string(),
            region: self.region.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

pub fn validate_run(run: &str) -> Option<String> {
    if run.trim().is_empty() {
        return Some("El RUN es requerido".into());
    }
    if !run.chars().all(|c| c.is_ascii_digit()) {
        return Some("El RUN debe contener solo números (sin puntos ni guión)".into());
    }
    if !(7..=8).contains(&run.len()) {
        return Some("El RUN debe tener entre 7 y 8 dígitos".into());
    }
    None
}

fn validate_person_name(value: &str, label: &str) -> Option<String> {
    let value = value.trim();
    let well_formed = value.chars().all(|c| c.is_alphabetic() || c == ' ');
    if value.chars().count() < 3 || !well_formed {
        return Some(format!("{label} debe tener al menos 3 caracteres y solo letras"));
    }
    None
}

pub fn validate_name(name: &str) -> Option<String> {
    validate_person_name(name, "El nombre")
}

pub fn validate_surname(surnames: &str) -> Option<String> {
    validate_person_name(surnames, "El apellido")
}

fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().split_once('@')?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.trim().contains(char::is_whitespace);
    well_formed.then(|| domain.to_ascii_lowercase())
}

pub fn validate_email(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        return Some("El email es requerido".into());
    }
    match email_domain(email) {
        None => Some("Ingrese un email válido".into()),
        Some(domain) if !ALLOWED_EMAIL_DOMAINS.contains(&domain.as_str()) => Some(format!(
            "El email debe ser de uno de estos dominios: {}",
            ALLOWED_EMAIL_DOMAINS.join(", ")
        )),
        Some(_) => None,
    }
}

pub fn is_academic_email(email: &str) -> bool {
    email_domain(email).is_some_and(|domain| ACADEMIC_EMAIL_DOMAINS.contains(&domain.as_str()))
}

fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Optional. Blank passes.
pub fn validate_phone(phone: &str) -> Option<String> {
    if phone.trim().is_empty() {
        return None;
    }
    let digits = phone_digits(phone);
    if digits.len() != 9 {
        return Some("El teléfono debe tener 9 dígitos".into());
    }
    if !digits.starts_with('9') {
        return Some("El teléfono debe empezar con 9".into());
    }
    None
}

/// Displays a mobile number as `9 1234 5678`. Anything else is returned
/// trimmed but otherwise untouched.
pub fn format_phone(phone: &str) -> String {
    let digits = phone_digits(phone);
    if digits.len() == 9 {
        format!("{} {} {}", &digits[..1], &digits[1..5], &digits[5..])
    } else {
        phone.trim().to_string()
    }
}

/// Whole years between `birthdate` and `today`, counting a year only once
/// its month and day have been reached.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years - 1
    } else {
        years
    }
}

pub fn validate_birthdate(birthdate: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    let Some(birthdate) = birthdate else {
        return Some("La fecha de nacimiento es requerida".into());
    };
    if birthdate > today {
        return Some("La fecha de nacimiento no puede ser futura".into());
    }
    if age_on(birthdate, today) < MINIMUM_AGE {
        return Some("Debes tener al menos 10 años para registrarte".into());
    }
    None
}

pub fn validate_password(password: &str, flow: Flow) -> Option<String> {
    let length = password.chars().count();
    match flow {
        Flow::Admin if password.is_empty() => Some("La contraseña es obligatoria".into()),
        Flow::Admin if !(4..=10).contains(&length) => {
            Some("La contraseña debe tener entre 4 y 10 caracteres".into())
        }
        Flow::SelfRegistration if length < 6 => {
            Some("La contraseña debe tener al menos 6 caracteres".into())
        }
        _ => None,
    }
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Option<String> {
    if confirmation.is_empty() {
        Some("Debe confirmar la contraseña".into())
    } else if password != confirmation {
        Some("Las contraseñas no coinciden".into())
    } else {
        None
    }
}

pub fn validate_terms(accepted: bool) -> Option<String> {
    (!accepted).then(|| "Debes aceptar los términos y condiciones".into())
}

/// Street line. Admins may enter shorter addresses than self-registration.
pub fn validate_address(street: &str, flow: Flow) -> Option<String> {
    let street = street.trim();
    let minimum = match flow {
        Flow::Admin => 3,
        Flow::SelfRegistration => 5,
    };
    if street.is_empty() {
        Some("La dirección es obligatoria".into())
    } else if street.chars().count() < minimum {
        Some(format!("La dirección debe tener al menos {minimum} caracteres"))
    } else {
        None
    }
}

pub fn validate_commune(commune: &str) -> Option<String> {
    commune.trim().is_empty().then(|| "Seleccione una comuna".into())
}

pub fn validate_region(region: &str) -> Option<String> {
    region.trim().is_empty().then(|| "Seleccione una región".into())
}

/// Runs every validator that applies to `flow`. Never fails; the caller
/// decides whether to block submission.
pub fn validate_all(form: &RegistrationForm, flow: Flow, today: NaiveDate) -> ValidationReport {
    let mut checks = vec![
        (Field::Run, validate_run(&form.run)),
        (Field::Name, validate_name(&form.name)),
        (Field::Surnames, validate_surname(&form.surnames)),
        (Field::Email, validate_email(&form.email)),
        (Field::Phone, validate_phone(&form.phone)),
        (Field::Birthdate, validate_birthdate(form.birthdate, today)),
        (Field::Street, validate_address(&form.street, flow)),
        (Field::Commune, validate_commune(&form.commune)),
        (Field::Region, validate_region(&form.region)),
        (Field::Password, validate_password(&form.password, flow)),
        (
            Field::PasswordConfirmation,
            validate_password_confirmation(&form.password, &form.password_confirmation),
        ),
    ];
    if flow == Flow::SelfRegistration {
        checks.push((Field::Terms, validate_terms(form.accepted_terms)));
    }

    let errors: BTreeMap<Field, String> = checks
        .into_iter()
        .filter_map(|(field, error)| error.map(|message| (field, message)))
        .collect();
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            run: "19876543".into(),
            name: "Matías".into(),
            surnames: "Núñez Peña".into(),
            email: "matias@gmail.com".into(),
            phone: "9 8765 4321".into(),
            birthdate: Some(date(2001, 5, 14)),
            street: "Av. Siempre Viva 742".into(),
            commune: "Providencia".into(),
            region: "Región Metropolitana".into(),
            password: "secreto1".into(),
            password_confirmation: "secreto1".into(),
            accepted_terms: true,
            user_type: UserType::Client,
        }
    }

    #[test]
    fn test_run_accepts_seven_or_eight_digits_only() {
        assert_eq!(validate_run("1234567"), None);
        assert_eq!(validate_run("12345678"), None);
        for bad in ["123456", "123456789", "1234567k", "12.345.678", "1234567-9", ""] {
            assert!(validate_run(bad).is_some(), "{bad} should fail");
        }
    }

    #[test]
    fn test_age_counts_month_and_day() {
        let today = date(2026, 10, 17);
        assert_eq!(age_on(date(2016, 10, 17), today), 10);
        assert_eq!(age_on(date(2016, 10, 18), today), 9);
        assert_eq!(validate_birthdate(Some(date(2016, 10, 17)), today), None);
        assert!(validate_birthdate(Some(date(2016, 10, 18)), today).is_some());
    }

    #[test]
    fn test_birthdate_is_required_and_not_future() {
        let today = date(2026, 10, 17);
        assert_eq!(
            validate_birthdate(None, today).as_deref(),
            Some("La fecha de nacimiento es requerida")
        );
        assert_eq!(
            validate_birthdate(Some(date(2027, 1, 1)), today).as_deref(),
            Some("La fecha de nacimiento no puede ser futura")
        );
    }

    #[test]
    fn test_names_allow_diacritics_and_spaces() {
        assert_eq!(validate_name("José Ñuñez"), None);
        assert!(validate_name("Al").is_some());
        assert!(validate_surname("O'Brien").is_some());
        assert!(validate_surname("R2D2").is_some());
    }

    #[test]
    fn test_email_must_be_in_allowed_domain() {
        assert_eq!(validate_email("ana@duocuc.cl"), None);
        assert_eq!(validate_email("ANA@Profesor.Duoc.cl"), None);
        assert!(validate_email("ana@hotmail.com").unwrap().contains("gmail.com"));
        assert_eq!(validate_email("ana@").as_deref(), Some("Ingrese un email válido"));
        assert!(validate_email("an a@gmail.com").is_some());

        assert!(is_academic_email("ana@duoc.cl"));
        assert!(!is_academic_email("ana@gmail.com"));
    }

    #[test]
    fn test_phone_is_optional_but_must_be_a_mobile_number() {
        assert_eq!(validate_phone(""), None);
        assert_eq!(validate_phone("+56 9 1234 5678"), Some("El teléfono debe tener 9 dígitos".into()));
        assert_eq!(validate_phone("9-1234-5678"), None);
        assert_eq!(validate_phone("812345678"), Some("El teléfono debe empezar con 9".into()));
        assert_eq!(format_phone("912345678"), "9 1234 5678");
        assert_eq!(format_phone(" 22 123 "), "22 123");
    }

    #[test]
    fn test_password_rules_depend_on_flow() {
        assert_eq!(validate_password("abcd", Flow::Admin), None);
        assert!(validate_password("abcdefghijk", Flow::Admin).is_some());
        assert!(validate_password("abcd", Flow::SelfRegistration).is_some());
        assert_eq!(validate_password("abcdefghijklmnop", Flow::SelfRegistration), None);
        assert!(validate_password_confirmation("abc", "abd").is_some());
        assert_eq!(validate_password_confirmation("abc", "abc"), None);
    }

    #[test]
    fn test_validate_all_collects_field_errors() {
        let today = date(2026, 10, 17);
        assert_eq!(validate_all(&valid_form(), Flow::SelfRegistration, today), ValidationReport {
            valid: true,
            errors: BTreeMap::new(),
        });

        let form = RegistrationForm {
            run: "123".into(),
            street: "Casa".into(),
            accepted_terms: false,
            ..valid_form()
        };
        let report = validate_all(&form, Flow::SelfRegistration, today);
        assert!(!report.valid);
        let fields: Vec<Field> = report.errors.keys().copied().collect();
        assert_eq!(fields, [Field::Run, Field::Street, Field::Terms]);

        // admins accept a four-letter street and never see the terms box
        let report = validate_all(&form, Flow::Admin, today);
        assert_eq!(report.errors.keys().copied().collect::<Vec<_>>(), [Field::Run]);
        assert!(report.error(Field::Run).is_some());
    }
}
