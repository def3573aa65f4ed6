/// ---- Fixed record sizes for the security v2 token commands ----
/// These are wire commitments: every record below is exchanged with the
/// device byte-for-byte and the decoders size their slots from them.
pub const NONCE_LEN: usize = 16;
pub const BOOT_NONCE_LEN: usize = 16;
pub const CHALLENGE_HEADER_LEN: usize = 64;
pub const P256_SIGNATURE_LEN: usize = 64;
pub const DETACHED_SIGNATURE_LEN: usize = CHALLENGE_HEADER_LEN + P256_SIGNATURE_LEN;
pub const TOKEN_LEN: usize = 16;
pub const TOKEN_SET_INFO_LEN: usize = 8;
pub const TOKEN_SET_COUNT_LEN: usize = 4;
pub const SET_INDEX_LEN: usize = 4;
/// Default response capacity for `GetTokensInSet` (tokens + boot nonce + signature).
pub const MAX_TOKEN_RESPONSE_LEN: usize = 1024;
