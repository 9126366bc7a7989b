pub const MAIN_MODEL_LOCATOR: &str = "cdn://LF_main_241030.glb";
pub const SENSORS_MODEL_LOCATOR: &str = "cdn://LF240929_sensors.glb";
pub const KIDS_PROJECTIONS_MODEL_LOCATOR: &str = "cdn://LF_kids_projections_241103.glb";

pub const MAIN_MODEL_LABEL: &str = "Main";
pub const SENSORS_MODEL_LABEL: &str = "Sensors";
pub const KIDS_PROJECTIONS_MODEL_LABEL: &str = "Kids Projections";
