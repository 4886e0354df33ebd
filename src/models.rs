//! Wire and client-side data types for the Agenda service
//!
//! Wire types use the service's camelCase field names; purely client-side
//! state (filters, pagination) keeps plain Rust naming.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contact as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub apellido: Option<String>,
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub favorito: bool,
    /// Category name; the service flattens the relation on read
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<NaiveDateTime>,
    #[serde(default)]
    pub fecha_actualizacion: Option<NaiveDateTime>,
}

/// Payload for creating or updating a contact
///
/// `None` fields are omitted from the JSON so the service's partial-update
/// semantics hold on PUT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    pub telefono: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub favorito: bool,
}

impl ContactRequest {
    /// Base request for editing an existing contact: current values carried
    /// over, category left untouched unless the caller sets it.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            nombre: contact.nombre.clone(),
            apellido: contact.apellido.clone(),
            telefono: contact.telefono.clone(),
            email: contact.email.clone(),
            direccion: contact.direccion.clone(),
            fecha_nacimiento: contact.fecha_nacimiento,
            notas: contact.notas.clone(),
            categoria_id: None,
            favorito: contact.favorito,
        }
    }
}

/// A user-defined category for grouping contacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Payload for creating or updating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

/// Aggregate statistics computed by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_contactos: u64,
    #[serde(default)]
    pub total_favoritos: u64,
    #[serde(default)]
    pub contactos_con_email: u64,
    #[serde(default)]
    pub contactos_con_telefono: u64,
    /// Category name → contact count
    #[serde(default)]
    pub por_categoria: HashMap<String, u64>,
    /// Most recently created contacts (service caps this at five)
    #[serde(default)]
    pub contactos_recientes: Vec<Contact>,
}

/// One page of a larger listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Wrap an unpaged array (search, favorites, by-category) in a single
    /// synthetic page.
    pub fn unpaged(content: Vec<T>) -> Self {
        let total_elements = content.len() as u64;
        Self {
            content,
            page: 0,
            size: 10,
            total_elements,
            total_pages: 1,
        }
    }

    /// The pagination cursor for this page, without the content.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// The (page, size, totalElements, totalPages) cursor kept in store state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            total_elements: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    /// `page * size < total_elements` when non-empty, else `page == 0`.
    pub fn is_consistent(&self) -> bool {
        if self.total_elements > 0 {
            (self.page as u64) * (self.size as u64) < self.total_elements
        } else {
            self.page == 0
        }
    }
}

/// Client-side listing filters; applied by re-querying the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub search_term: String,
    pub category: Option<i64>,
    pub favorites: bool,
}

/// Partial update for [`Filters`]; `None` fields are left as they were
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub search_term: Option<String>,
    pub category: Option<Option<i64>>,
    pub favorites: Option<bool>,
}

impl Filters {
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(term) = update.search_term {
            self.search_term = term;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(favorites) = update.favorites {
            self.favorites = favorites;
        }
    }
}

/// Response of `GET /v1/status`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Error payload emitted by the service; only `message` is surfaced
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: u16,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
