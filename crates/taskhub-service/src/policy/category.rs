//! Categories are shared by every authenticated user.

use taskhub_entity::category::Category;

use super::EntityPolicy;

/// No rules beyond authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryPolicy;

impl EntityPolicy<Category> for CategoryPolicy {}
