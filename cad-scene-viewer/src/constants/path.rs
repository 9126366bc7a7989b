/// Name of the asset source the model locators are resolved against.
pub const MODEL_SOURCE_ID: &str = "cdn";

/// Root of the model source. The glTF exports are mirrored here next to the
/// viewer; on the web it is fetched relative to the page.
pub const MODEL_SOURCE_ROOT: &str = "assets/models";

/// Optional manifest overriding the built-in model locators.
pub const VIEWER_MANIFEST_PATH: &str = "viewer_manifest.json";
