//! Constants shared across the publishing pipeline
//!
//! Most of these values mirror the enum-like string properties accepted by
//! the CurseForge upload API and are used to validate user input.

/// User agent sent with every API request.
pub const USER_AGENT: &str = "curseforge-publisher";

/// Header carrying the CurseForge API token.
pub const API_TOKEN_HEADER: &str = "X-Api-Token";

/// Default game API endpoint. Endpoints are game specific, this one targets
/// Minecraft which is by far the most common use case.
pub const DEFAULT_API_ENDPOINT: &str = "https://minecraft.curseforge.com";

/// Relation type for projects embedded within the uploaded file.
pub const RELATION_EMBEDDED: &str = "embeddedLibrary";

/// Relation type for projects that must not be installed alongside this one.
pub const RELATION_INCOMPATIBLE: &str = "incompatible";

/// Relation type for projects with special but optional support.
pub const RELATION_OPTIONAL: &str = "optionalDependency";

/// Relation type for projects required for this file to work.
pub const RELATION_REQUIRED: &str = "requiredDependency";

/// Relation type for tool projects. The platform has never documented what
/// this actually does.
pub const RELATION_TOOL: &str = "tool";

/// All relation types known to be accepted by the API.
pub const VALID_RELATION_TYPES: &[&str] = &[
    RELATION_EMBEDDED,
    RELATION_INCOMPATIBLE,
    RELATION_OPTIONAL,
    RELATION_REQUIRED,
    RELATION_TOOL,
];

/// Plain text changelog. No formatting is applied.
pub const CHANGELOG_TEXT: &str = "text";

/// HTML changelog. Only a subset of HTML is rendered.
pub const CHANGELOG_HTML: &str = "html";

/// Markdown changelog. Only a subset of markdown is rendered.
pub const CHANGELOG_MARKDOWN: &str = "markdown";

/// All changelog types known to be accepted by the API.
pub const VALID_CHANGELOG_TYPES: &[&str] = &[CHANGELOG_TEXT, CHANGELOG_HTML, CHANGELOG_MARKDOWN];

/// Alpha release. Often hidden from API responses and user views.
pub const RELEASE_TYPE_ALPHA: &str = "alpha";

/// Beta release. Often hidden from API responses and user views.
pub const RELEASE_TYPE_BETA: &str = "beta";

/// Full release. Considered a stable build.
pub const RELEASE_TYPE_RELEASE: &str = "release";

/// All release types known to be accepted by the API.
pub const VALID_RELEASE_TYPES: &[&str] = &[
    RELEASE_TYPE_ALPHA,
    RELEASE_TYPE_BETA,
    RELEASE_TYPE_RELEASE,
];

/// Checks a relation type against the known set. Unknown values are allowed
/// through as a forward compatibility measure, callers surface a warning.
pub fn is_known_relation_type(value: &str) -> bool {
    VALID_RELATION_TYPES.contains(&value)
}

/// Checks a changelog type against the known set.
pub fn is_known_changelog_type(value: &str) -> bool {
    VALID_CHANGELOG_TYPES.contains(&value)
}

/// Checks a release type against the known set.
pub fn is_known_release_type(value: &str) -> bool {
    VALID_RELEASE_TYPES.contains(&value)
}
