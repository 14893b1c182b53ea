mod entity;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Entity)]
// ============================================================================

/// Derive macro for the `Entity` trait.
///
/// Generates the kind/collection names, identifier accessors, required-field
/// validation and the hooks for server-owned creation timestamps.
///
/// # Usage
///
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize, Entity)]
/// #[entity(kind = "customer", collection = "customers")]
/// pub struct Customer {
///     #[serde(default)]
///     pub id: EntityId,
///     #[entity(required)]
///     pub name: String,
///     #[entity(created_at)]
///     #[serde(default)]
///     pub created_at: Timestamp,
/// }
/// ```
///
/// Struct attributes:
/// - `kind = "..."`: singular name used in error messages. Defaults to the
///   snake_case struct name.
/// - `collection = "..."`: plural name used for routes and snapshot files.
///   Defaults to `kind` + `s`.
///
/// Field attributes:
/// - `id`: marks the identifier field (defaults to a field named `id`).
/// - `required`: the field must not be blank/empty (`bookstore::Required`).
/// - `non_negative`: numeric field must be `>= 0` (`bookstore::NonNegative`).
/// - `created_at`: stamped on create and carried over on update.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
