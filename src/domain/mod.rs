pub mod provisioning;
pub mod tokens;
