//! Field-level validation rules for contact and category forms
//!
//! Every rule is pure and field-scoped: it maps a candidate value to `None`
//! (valid) or a user-facing message. Optional string fields treat the empty
//! string as absent. The aggregate validators run every relevant rule and
//! collect the failures per field; they serve both incremental (per-field)
//! checks and the pre-submit pass, so there is a single rule table to keep
//! in sync.

use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{CategoryRequest, ContactRequest};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const PHONE_MIN: usize = 7;
const PHONE_MAX: usize = 15;
const ADDRESS_MAX: usize = 200;
const NOTES_MAX: usize = 500;
const DESCRIPTION_MAX: usize = 200;
const MAX_AGE_YEARS: i32 = 150;

/// Letters (any script, accents included), spaces, hyphens, apostrophes.
fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c == ' ' || c == '-' || c == '\''
}

fn check_name_shape(name: &str, label: &str) -> Option<String> {
    let len = name.chars().count();
    if len < NAME_MIN {
        return Some(format!("{label} debe tener al menos {NAME_MIN} caracteres"));
    }
    if len > NAME_MAX {
        return Some(format!("{label} no puede exceder {NAME_MAX} caracteres"));
    }
    if !name.chars().all(is_name_char) {
        return Some(format!(
            "{label} solo puede contener letras, espacios y guiones"
        ));
    }
    None
}

pub fn validate_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("El nombre es requerido".into());
    }
    check_name_shape(name, "El nombre")
}

pub fn validate_last_name(last_name: &str) -> Option<String> {
    if last_name.is_empty() {
        return None;
    }
    check_name_shape(last_name, "El apellido")
}

pub fn validate_phone(phone: &str) -> Option<String> {
    if phone.is_empty() {
        return Some("El teléfono es requerido".into());
    }
    let clean: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !clean.chars().all(|c| c.is_ascii_digit()) || clean.is_empty() {
        return Some("El teléfono solo debe contener números".into());
    }
    if clean.len() < PHONE_MIN || clean.len() > PHONE_MAX {
        return Some(format!(
            "El teléfono debe tener entre {PHONE_MIN} y {PHONE_MAX} dígitos"
        ));
    }
    None
}

pub fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return None;
    }
    let invalid = Some("El formato del email no es válido".into());
    if email.chars().any(char::is_whitespace) {
        return invalid;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return invalid;
    };
    if local.is_empty() || domain.contains('@') {
        return invalid;
    }
    // Domain needs at least one interior dot
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return invalid;
    }
    None
}

pub fn validate_address(address: &str) -> Option<String> {
    if address.chars().count() > ADDRESS_MAX {
        return Some(format!(
            "La dirección no puede exceder {ADDRESS_MAX} caracteres"
        ));
    }
    None
}

pub fn validate_notes(notes: &str) -> Option<String> {
    if notes.chars().count() > NOTES_MAX {
        return Some(format!("Las notas no pueden exceder {NOTES_MAX} caracteres"));
    }
    None
}

/// Oldest acceptable birth date: today minus 150 years, clamped off Feb 29.
fn oldest_birth_date(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year() - MAX_AGE_YEARS, today.month(), today.day())
        .unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(today.year() - MAX_AGE_YEARS, today.month(), 28)
                .unwrap_or(today)
        })
}

pub fn validate_birth_date(date: NaiveDate) -> Option<String> {
    validate_birth_date_at(date, Local::now().date_naive())
}

fn validate_birth_date_at(date: NaiveDate, today: NaiveDate) -> Option<String> {
    if date > today {
        return Some("La fecha de nacimiento no puede ser en el futuro".into());
    }
    if date < oldest_birth_date(today) {
        return Some(format!(
            "La fecha de nacimiento no puede ser hace más de {MAX_AGE_YEARS} años"
        ));
    }
    None
}

pub fn validate_category_ref(category_id: i64) -> Option<String> {
    if category_id < 1 {
        return Some("La categoría seleccionada no es válida".into());
    }
    None
}

pub fn validate_category_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("El nombre de la categoría es requerido".into());
    }
    check_name_shape(name, "El nombre")
}

pub fn validate_category_description(description: &str) -> Option<String> {
    if description.chars().count() > DESCRIPTION_MAX {
        return Some(format!(
            "La descripción no puede exceder {DESCRIPTION_MAX} caracteres"
        ));
    }
    None
}

pub fn validate_category_color(color: &str) -> Option<String> {
    if color.is_empty() {
        return None;
    }
    let hex = color.strip_prefix('#');
    let valid = matches!(hex, Some(digits)
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Some("El color debe estar en formato hexadecimal (#XXXXXX)".into());
    }
    None
}

/// Per-field failures from an aggregate validation pass, keyed by wire name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First failing field's message, in field-name order.
    pub fn first(&self) -> Option<&str> {
        self.errors.values().next().map(String::as_str)
    }

    fn push(&mut self, field: &str, result: Option<String>) {
        if let Some(message) = result {
            self.errors.insert(field.to_string(), message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, message) in &self.errors {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Run every contact rule; a submission is blocked when the result is invalid.
pub fn validate_contact(contact: &ContactRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.push("nombre", validate_name(&contact.nombre));
    errors.push("telefono", validate_phone(&contact.telefono));
    errors.push(
        "apellido",
        validate_last_name(contact.apellido.as_deref().unwrap_or_default()),
    );
    errors.push(
        "email",
        validate_email(contact.email.as_deref().unwrap_or_default()),
    );
    errors.push(
        "direccion",
        validate_address(contact.direccion.as_deref().unwrap_or_default()),
    );
    errors.push(
        "notas",
        validate_notes(contact.notas.as_deref().unwrap_or_default()),
    );
    errors.push(
        "fechaNacimiento",
        contact.fecha_nacimiento.and_then(validate_birth_date),
    );
    errors.push(
        "categoriaId",
        contact.categoria_id.and_then(validate_category_ref),
    );
    errors
}

pub fn validate_category(category: &CategoryRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.push("nombre", validate_category_name(&category.nombre));
    errors.push(
        "descripcion",
        validate_category_description(category.descripcion.as_deref().unwrap_or_default()),
    );
    errors.push(
        "color",
        validate_category_color(category.color.as_deref().unwrap_or_default()),
    );
    errors
}
