pub mod security_v2;
