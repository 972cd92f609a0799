/// Maximum length of a category name, in characters
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Path segment appended to the configured API URL for admin endpoints
pub const ADMIN_API_PREFIX: &str = "/api/admin";

/// Separator used when rendering a category path as a breadcrumb
pub const PATH_SEPARATOR: &str = " > ";

/// Label rendered for an empty category path
pub const EMPTY_PATH_LABEL: &str = "None";

/// Label used when a sub-category's main category cannot be resolved
pub const UNKNOWN_PARENT_LABEL: &str = "Unknown Parent";
