// Owner-scoped listings. Each handler takes an `AuthUser` (401 without a
// valid session) and checks it against the `email` query parameter (403 on
// mismatch) before touching the store.

pub mod foods;
pub mod orders;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}
