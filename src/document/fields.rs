//! Dotted field paths of the listing document.

pub const ID: &str = "_id";
pub const STATE: &str = "stateMaloi";
pub const DELETED: &str = "deleted";
pub const PRICE: &str = "price";
pub const DESCRIPTION: &str = "description";
pub const LAST_UPDATE: &str = "mLastUpdate";
pub const UPDATED_BY: &str = "userUpdate";

pub const TITLE: &str = "realEstate.title";
pub const PROPERTIES: &str = "realEstate.properties";
pub const ADVERTISER: &str = "realEstate.advertiser";

pub const FLOOR: &str = "realEstate.properties.floor";
pub const PROVINCE: &str = "realEstate.properties.location.province";
pub const AGENCY_NAME: &str = "realEstate.advertiser.agency.displayName";

pub const MAIN_FEATURE_TYPE: &str = "realEstate.properties.mainFeatures.type";
pub const MAIN_FEATURE_LABEL: &str = "realEstate.properties.mainFeatures.compactLabel";

pub const PRIMARY_FEATURES: &str = "realEstate.properties.primaryFeatures";
pub const PRIMARY_FEATURE_NAME: &str = "realEstate.properties.primaryFeatures.name";
pub const PRIMARY_FEATURE_VALUE: &str = "realEstate.properties.primaryFeatures.value";
