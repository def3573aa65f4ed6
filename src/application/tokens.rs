//! Token-set queries.
//!
//! Each query is one security v2 exchange bound to a fresh challenge nonce:
//! check the version, draw the nonce, encode, dispatch, decode, validate.
//! The first failure aborts with the stage it happened in; nothing is
//! returned alongside an error.

use zerocopy::{FromZeros, IntoBytes};

use super::context::DeviceContext;
use super::errors::{AtStage, ErrorKind, Operation, OperationError, Stage};
use crate::config::TokenQueryConfig;
use crate::domain::tokens::params::{
    BOOT_NONCE_LEN, DETACHED_SIGNATURE_LEN, SET_INDEX_LEN, TOKEN_SET_COUNT_LEN, TOKEN_SET_INFO_LEN,
};
use crate::domain::tokens::{
    BootNonce, DetachedSignature, TokenSet, TokenSetCount, TokenSetInfo, TokenSetInfoReport, TokensInSet,
};
use crate::ports::nonce::NonceSource;
use crate::ports::transport::HostTransport;
use crate::protocol::security_v2::layout::fixed_response_size;
use crate::protocol::security_v2::{
    decode_fixed, decode_serialized, encode_request, Param, RequestBuffer, ResponseBuffer, SerializedField,
    TokenCommand,
};

/// Encode `params` for `command`, send it, and return the filled response buffer.
fn exchange<T: HostTransport>(
    ctx: &mut DeviceContext<T>,
    op: Operation,
    command: TokenCommand,
    params: &[Param<'_>],
    response_capacity: usize,
) -> Result<ResponseBuffer, OperationError> {
    let code = command.code();
    let lens: Vec<usize> = params.iter().map(Param::len).collect();
    let mut request = RequestBuffer::sized_for(&lens);
    encode_request(&code, params, &mut request).at(op, Stage::Encode)?;

    let mut response = ResponseBuffer::with_capacity(response_capacity);
    ctx.dispatcher()
        .execute(&code, &request, &mut response)
        .at(op, Stage::Dispatch)?;
    Ok(response)
}

/// Ask how many token sets the device holds.
///
/// # Errors
/// Any [`OperationError`]; see the module docs for the stage order.
pub fn get_token_set_count<T, N>(ctx: &mut DeviceContext<T>, nonces: &mut N) -> Result<TokenSetCount, OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
{
    const OP: Operation = Operation::GetTokenSetCount;
    ctx.ensure_supported(OP)?;
    let nonce = nonces.generate().at(OP, Stage::GenerateNonce)?;

    let response = exchange(
        ctx,
        OP,
        TokenCommand::GetTokenSetCount,
        &[Param::from(nonce.as_bytes())],
        fixed_response_size(TOKEN_SET_COUNT_LEN + BOOT_NONCE_LEN + DETACHED_SIGNATURE_LEN),
    )?;

    let mut count = [0u8; TOKEN_SET_COUNT_LEN];
    let mut boot_nonce = BootNonce::default();
    let mut signature = DetachedSignature::new_zeroed();
    decode_fixed(
        &response,
        &mut [&mut count[..], boot_nonce.as_mut_bytes(), signature.as_mut_bytes()],
    )
    .at(OP, Stage::Decode)?;

    let count = u32::from_le_bytes(count);
    log::debug!("{OP}: device reports {count} token sets");
    Ok(TokenSetCount {
        count,
        boot_nonce,
        signature,
    })
}

/// Fetch the descriptive record of token set `set_index`.
///
/// # Errors
/// Any [`OperationError`]; see the module docs for the stage order.
pub fn get_token_set_info<T, N>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    set_index: u32,
) -> Result<TokenSetInfoReport, OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
{
    const OP: Operation = Operation::GetTokenSetInfo;
    ctx.ensure_supported(OP)?;
    let nonce = nonces.generate().at(OP, Stage::GenerateNonce)?;

    let index: [u8; SET_INDEX_LEN] = set_index.to_le_bytes();
    let response = exchange(
        ctx,
        OP,
        TokenCommand::GetTokenSetInfo,
        &[Param::from(&index), Param::from(nonce.as_bytes())],
        fixed_response_size(TOKEN_SET_INFO_LEN + BOOT_NONCE_LEN + DETACHED_SIGNATURE_LEN),
    )?;

    let mut info = TokenSetInfo::new_zeroed();
    let mut boot_nonce = BootNonce::default();
    let mut signature = DetachedSignature::new_zeroed();
    decode_fixed(
        &response,
        &mut [info.as_mut_bytes(), boot_nonce.as_mut_bytes(), signature.as_mut_bytes()],
    )
    .at(OP, Stage::Decode)?;

    Ok(TokenSetInfoReport {
        set_index,
        info,
        boot_nonce,
        signature,
    })
}

/// List the tokens of set `set_index` with the default response capacity.
///
/// # Errors
/// Any [`OperationError`]; see [`get_tokens_in_set_with_config`].
pub fn get_tokens_in_set<T, N>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    set_index: u32,
) -> Result<TokensInSet, OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
{
    get_tokens_in_set_with_config(ctx, nonces, set_index, &TokenQueryConfig::default())
}

/// List the tokens of set `set_index`.
///
/// The response is self-describing: tokens, boot nonce, signature. The token
/// blob must fit `cfg.max_token_response_len` and be a whole number of tokens.
///
/// # Errors
/// * `MissingField` when the response omits one of its three fields.
/// * `SizeConstraintViolated` when the token blob breaks a size rule.
/// * Any earlier-stage [`OperationError`].
pub fn get_tokens_in_set_with_config<T, N>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    set_index: u32,
    cfg: &TokenQueryConfig,
) -> Result<TokensInSet, OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
{
    const OP: Operation = Operation::GetTokensInSet;
    ctx.ensure_supported(OP)?;
    let nonce = nonces.generate().at(OP, Stage::GenerateNonce)?;

    let index = set_index.to_le_bytes();
    let response = exchange(
        ctx,
        OP,
        TokenCommand::GetTokensInSet,
        &[Param::from(&index), Param::from(nonce.as_bytes())],
        cfg.max_token_response_len,
    )?;

    let mut fields = [SerializedField::ABSENT; 3];
    let count = decode_serialized(&response, &mut fields).at(OP, Stage::Decode)?;
    log::debug!("{OP}: set {set_index} response carries {count} fields");

    let [tokens, boot_nonce, signature] = fields;
    let tokens = required(tokens, "tokens")?;
    let boot_nonce = required(boot_nonce, "boot_nonce")?;
    let signature = required(signature, "signature")?;

    let tokens = TokenSet::from_blob(tokens, cfg.max_token_response_len)
        .inspect_err(|e| log::warn!("{OP}: set {set_index}: {e}"))
        .at(OP, Stage::Validate)?;

    Ok(TokensInSet {
        set_index,
        tokens,
        boot_nonce: boot_nonce.to_vec(),
        signature: signature.to_vec(),
    })
}

fn required<'a>(field: SerializedField<'a>, name: &'static str) -> Result<&'a [u8], OperationError> {
    field.value().ok_or_else(|| {
        log::warn!("{}: failed to parse {name} from response", Operation::GetTokensInSet);
        OperationError::new(Operation::GetTokensInSet, Stage::Decode, ErrorKind::MissingField(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::SecurityVersion;
    use crate::domain::tokens::params::NONCE_LEN;
    use crate::ports::transport::TransportError;
    use crate::protocol::security_v2::WireError;
    use crate::test_support::{
        bytes_of, fixed_response, pattern, serialized_response, FailingNonceSource, FixedNonceSource,
        ScriptedTransport, TEST_NONCE_BYTE,
    };

    fn v2(t: ScriptedTransport) -> DeviceContext<ScriptedTransport> {
        DeviceContext::new(t, SecurityVersion::V2)
    }

    #[test]
    fn count_request_carries_only_the_nonce() {
        let sig = bytes_of(0x5A, DETACHED_SIGNATURE_LEN);
        let reply = fixed_response(&[&7u32.to_le_bytes(), &[0x11; BOOT_NONCE_LEN], &sig]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let mut nonces = FixedNonceSource::default();

        let out = get_token_set_count(&mut ctx, &mut nonces).unwrap();
        assert_eq!(out.count, 7);
        assert_eq!(out.boot_nonce.as_bytes(), &[0x11; BOOT_NONCE_LEN]);
        assert_eq!(out.signature.as_bytes(), sig.as_slice());

        let sent = &ctx.transport_mut().sent()[0];
        let code = TokenCommand::GetTokenSetCount.code();
        assert_eq!(sent.base, code.base);
        assert_eq!(&sent.request[..4], &[code.major, code.minor, 1, 0]);
        assert_eq!(&sent.request[4..8], &[16, 0, 0, 0]);
        assert_eq!(&sent.request[8..], &[TEST_NONCE_BYTE; NONCE_LEN]);
    }

    #[test]
    fn info_decodes_record() {
        let info = TokenSetInfo::new(1, 2, true);
        let reply = fixed_response(&[info.as_bytes(), &[0; BOOT_NONCE_LEN], &[0; DETACHED_SIGNATURE_LEN]]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));

        let out = get_token_set_info(&mut ctx, &mut FixedNonceSource::default(), 5).unwrap();
        assert_eq!(out.set_index, 5);
        assert_eq!(out.info, info);
        assert_eq!(&ctx.transport_mut().sent()[0].request[12..16], &[5, 0, 0, 0]);
    }

    #[test]
    fn tokens_validated_against_token_size() {
        let reply = serialized_response(&[&pattern(17), &[0; 16], &[0; 128]]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let err = get_tokens_in_set(&mut ctx, &mut FixedNonceSource::default(), 0).unwrap_err();
        assert_eq!(err.stage, Stage::Validate);
        assert!(matches!(err.kind, ErrorKind::SizeConstraintViolated(_)));
    }

    #[test]
    fn tokens_missing_signature_field() {
        let reply = serialized_response(&[&pattern(16), &[0; 16]]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let err = get_tokens_in_set(&mut ctx, &mut FixedNonceSource::default(), 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField("signature"));
        assert_eq!(err.stage, Stage::Decode);
    }

    #[test]
    fn tokens_framing_error_is_decode_stage() {
        let mut reply = serialized_response(&[&pattern(16), &[0; 16], &[0; 128]]);
        reply.pop();
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let err = get_tokens_in_set(&mut ctx, &mut FixedNonceSource::default(), 0).unwrap_err();
        assert_eq!(err.stage, Stage::Decode);
        assert!(matches!(err.kind, ErrorKind::Wire(WireError::SizePayloadMismatch { .. })));
    }

    #[test]
    fn small_capacity_turns_long_reply_into_transport_error() {
        let reply = serialized_response(&[&pattern(64), &[0; 16], &[0; 128]]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let cfg = TokenQueryConfig {
            max_token_response_len: 100,
        };
        let err = get_tokens_in_set_with_config(&mut ctx, &mut FixedNonceSource::default(), 1, &cfg).unwrap_err();
        assert_eq!(err.stage, Stage::Dispatch);
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
    }

    #[test]
    fn unsupported_version_never_draws_a_nonce() {
        for version in [SecurityVersion::V3, SecurityVersion::Unknown(9)] {
            let mut ctx = DeviceContext::new(ScriptedTransport::new(), version);
            let mut nonces = FixedNonceSource::default();
            let err = get_token_set_count(&mut ctx, &mut nonces).unwrap_err();
            assert_eq!(err.stage, Stage::CheckVersion);
            assert!(matches!(err.kind, ErrorKind::UnsupportedVersion(_)));
            assert_eq!(nonces.calls, 0);
            assert!(ctx.transport_mut().sent().is_empty());
        }
    }

    #[test]
    fn entropy_failure_sends_nothing() {
        let mut ctx = v2(ScriptedTransport::new());
        let err = get_token_set_info(&mut ctx, &mut FailingNonceSource, 1).unwrap_err();
        assert_eq!(err.stage, Stage::GenerateNonce);
        assert!(matches!(err.kind, ErrorKind::Entropy(_)));
        assert!(ctx.transport_mut().sent().is_empty());
    }

    #[test]
    fn rejection_is_reported_with_status() {
        let mut ctx = v2(ScriptedTransport::new().fail(TransportError::Status(0x0C)));
        let err = get_token_set_count(&mut ctx, &mut FixedNonceSource::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CommandRejected { status: 0x0C });
    }

    #[test]
    fn fixed_count_mismatch_is_decode_error() {
        let reply = fixed_response(&[&[0; 4], &[0; 16]]);
        let mut ctx = v2(ScriptedTransport::new().reply(reply));
        let err = get_token_set_count(&mut ctx, &mut FixedNonceSource::default()).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Wire(WireError::SlotCountMismatch { expected: 3, actual: 2 })
        );
    }
}
