//! Command runners: resolve named parameters, run the operation, write sinks.
//!
//! Every parameter is resolved before the device is touched, and sinks are
//! created only once the operation has returned validated output. A failed
//! run therefore leaves no artifacts behind.

use std::io::Write;

use zerocopy::IntoBytes;

use super::context::DeviceContext;
use super::errors::{AtStage, ErrorKind, Operation, OperationError, Stage};
use super::invocation::Invocation;
use super::provisioning::{get_provisioning_log_with_config, validate_and_sign_with_config};
use super::tokens::{get_token_set_count, get_token_set_info, get_tokens_in_set_with_config};
use crate::config::HothConfig;
use crate::ports::artifacts::ArtifactStore;
use crate::ports::nonce::NonceSource;
use crate::ports::transport::HostTransport;

/// Create each sink in turn and write its bytes.
fn write_sinks<A: ArtifactStore + ?Sized>(
    store: &mut A,
    op: Operation,
    sinks: &[(&str, &[u8])],
) -> Result<(), OperationError> {
    for (path, bytes) in sinks {
        let mut sink = store.create(path).map_err(|e| {
            OperationError::new(
                op,
                Stage::WriteSinks,
                ErrorKind::SinkOpen {
                    path: (*path).to_owned(),
                    reason: e.to_string(),
                },
            )
        })?;
        sink.write_all(bytes).and_then(|()| sink.flush()).map_err(|e| {
            OperationError::new(
                op,
                Stage::WriteSinks,
                ErrorKind::SinkWrite {
                    path: (*path).to_owned(),
                    reason: e.to_string(),
                },
            )
        })?;
    }
    Ok(())
}

/// Parameters: `token_output`, `signature_output`, `boot_nonce_output`, `set_index`.
///
/// # Errors
/// Any [`OperationError`]; no sink exists unless the call succeeds.
pub fn run_get_tokens_in_set<T, N, A>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    store: &mut A,
    cfg: &HothConfig,
    inv: &Invocation,
) -> Result<(), OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    const OP: Operation = Operation::GetTokensInSet;
    let token_output = inv.param_str("token_output").at(OP, Stage::ResolveParameters)?;
    let signature_output = inv.param_str("signature_output").at(OP, Stage::ResolveParameters)?;
    let boot_nonce_output = inv.param_str("boot_nonce_output").at(OP, Stage::ResolveParameters)?;
    let set_index = inv.param_u32("set_index").at(OP, Stage::ResolveParameters)?;

    let result = get_tokens_in_set_with_config(ctx, nonces, set_index, &cfg.tokens)?;
    write_sinks(
        store,
        OP,
        &[
            (token_output, result.tokens.as_bytes()),
            (signature_output, &result.signature),
            (boot_nonce_output, &result.boot_nonce),
        ],
    )?;
    log::info!("{OP}: wrote {} tokens of set {set_index} to {token_output}", result.tokens.len());
    Ok(())
}

/// Parameters: `num_ids_output`, `boot_nonce_output`, `signature_output`.
///
/// The count is written as a little-endian `u32`.
///
/// # Errors
/// Any [`OperationError`]; no sink exists unless the call succeeds.
pub fn run_get_token_set_count<T, N, A>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    store: &mut A,
    inv: &Invocation,
) -> Result<(), OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    const OP: Operation = Operation::GetTokenSetCount;
    let num_ids_output = inv.param_str("num_ids_output").at(OP, Stage::ResolveParameters)?;
    let boot_nonce_output = inv.param_str("boot_nonce_output").at(OP, Stage::ResolveParameters)?;
    let signature_output = inv.param_str("signature_output").at(OP, Stage::ResolveParameters)?;

    let result = get_token_set_count(ctx, nonces)?;
    write_sinks(
        store,
        OP,
        &[
            (num_ids_output, &result.count_bytes()),
            (boot_nonce_output, result.boot_nonce.as_bytes()),
            (signature_output, result.signature.as_bytes()),
        ],
    )?;
    log::info!("{OP}: device holds {} token sets", result.count);
    Ok(())
}

/// Parameters: `set_index`, `token_set_info`.
///
/// # Errors
/// Any [`OperationError`]; no sink exists unless the call succeeds.
pub fn run_get_token_set_info<T, N, A>(
    ctx: &mut DeviceContext<T>,
    nonces: &mut N,
    store: &mut A,
    inv: &Invocation,
) -> Result<(), OperationError>
where
    T: HostTransport,
    N: NonceSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    const OP: Operation = Operation::GetTokenSetInfo;
    let set_index = inv.param_u32("set_index").at(OP, Stage::ResolveParameters)?;
    let token_set_info = inv.param_str("token_set_info").at(OP, Stage::ResolveParameters)?;

    let result = get_token_set_info(ctx, nonces, set_index)?;
    write_sinks(store, OP, &[(token_set_info, result.info.as_bytes())])?;
    log::info!(
        "{OP}: set {set_index} category {} holds {} tokens{}",
        result.info.category(),
        result.info.num_tokens(),
        if result.info.is_frozen() { " (frozen)" } else { "" }
    );
    Ok(())
}

/// Parameters: `output`.
///
/// # Errors
/// Any [`OperationError`]; no sink exists unless the call succeeds.
pub fn run_get_provisioning_log<T, A>(
    ctx: &mut DeviceContext<T>,
    store: &mut A,
    cfg: &HothConfig,
    inv: &Invocation,
) -> Result<(), OperationError>
where
    T: HostTransport,
    A: ArtifactStore + ?Sized,
{
    const OP: Operation = Operation::GetProvisioningLog;
    let output = inv.param_str("output").at(OP, Stage::ResolveParameters)?;

    let log = get_provisioning_log_with_config(ctx, &cfg.provisioning)?;
    if !log.checksum_matches() {
        log::warn!("{OP}: log checksum does not match its header");
    }
    write_sinks(store, OP, &[(output, &log.data)])?;
    log::info!("{OP}: wrote {} bytes to {output}", log.data.len());
    Ok(())
}

/// Parameters: `perso_blob` (input), `output`.
///
/// # Errors
/// Any [`OperationError`]. An unreadable blob is a `SourceRead`, an empty
/// one an `InvalidParameter`.
pub fn run_validate_and_sign<T, A>(
    ctx: &mut DeviceContext<T>,
    store: &mut A,
    cfg: &HothConfig,
    inv: &Invocation,
) -> Result<(), OperationError>
where
    T: HostTransport,
    A: ArtifactStore + ?Sized,
{
    const OP: Operation = Operation::ValidateAndSign;
    let perso_blob = inv.param_str("perso_blob").at(OP, Stage::ResolveParameters)?;
    let output = inv.param_str("output").at(OP, Stage::ResolveParameters)?;

    let blob = store
        .read(perso_blob)
        .map_err(|e| ErrorKind::SourceRead {
            path: perso_blob.to_owned(),
            reason: e.to_string(),
        })
        .at(OP, Stage::ResolveParameters)?;
    if blob.is_empty() {
        return Err(OperationError::new(
            OP,
            Stage::ResolveParameters,
            ErrorKind::InvalidParameter {
                name: "perso_blob".to_owned(),
                value: perso_blob.to_owned(),
            },
        ));
    }

    let cert = validate_and_sign_with_config(ctx, &blob, &cfg.provisioning)?;
    write_sinks(store, OP, &[(output, &cert)])?;
    log::info!("{OP}: wrote {} byte certificate to {output}", cert.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::SecurityVersion;
    use crate::test_support::{fixed_response, FixedNonceSource, MemoryArtifacts, ScriptedTransport};

    #[test]
    fn parameters_resolve_before_device_traffic() {
        let mut ctx = DeviceContext::new(ScriptedTransport::new(), SecurityVersion::V2);
        let mut nonces = FixedNonceSource::default();
        let mut store = MemoryArtifacts::new();
        let inv = Invocation::new().with("num_ids_output", "n").with("boot_nonce_output", "b");

        let err = run_get_token_set_count(&mut ctx, &mut nonces, &mut store, &inv).unwrap_err();
        assert_eq!(err.stage, Stage::ResolveParameters);
        assert_eq!(err.kind, ErrorKind::MissingParameter("signature_output".into()));
        assert_eq!(nonces.calls, 0);
        assert!(ctx.transport_mut().sent().is_empty());
    }

    #[test]
    fn count_sinks_hold_le_count_and_raw_fields() {
        let reply = fixed_response(&[&3u32.to_le_bytes(), &[0x22; 16], &[0x33; 128]]);
        let mut ctx = DeviceContext::new(ScriptedTransport::new().reply(reply), SecurityVersion::V2);
        let mut store = MemoryArtifacts::new();
        let inv = Invocation::new()
            .with("num_ids_output", "n")
            .with("boot_nonce_output", "b")
            .with("signature_output", "s");

        run_get_token_set_count(&mut ctx, &mut FixedNonceSource::default(), &mut store, &inv).unwrap();
        assert_eq!(store.get("n"), Some(&[3, 0, 0, 0][..]));
        assert_eq!(store.get("b"), Some(&[0x22; 16][..]));
        assert_eq!(store.get("s"), Some(&[0x33; 128][..]));
    }

    #[test]
    fn sink_open_failure_is_reported_as_such() {
        let reply = fixed_response(&[&3u32.to_le_bytes(), &[0; 16], &[0; 128]]);
        let mut ctx = DeviceContext::new(ScriptedTransport::new().reply(reply), SecurityVersion::V2);
        let mut store = MemoryArtifacts::new();
        store.fail_create = Some("b".into());
        let inv = Invocation::new()
            .with("num_ids_output", "n")
            .with("boot_nonce_output", "b")
            .with("signature_output", "s");

        let err = run_get_token_set_count(&mut ctx, &mut FixedNonceSource::default(), &mut store, &inv).unwrap_err();
        assert_eq!(err.stage, Stage::WriteSinks);
        assert!(matches!(err.kind, ErrorKind::SinkOpen { ref path, .. } if path == "b"));
    }

    #[test]
    fn missing_perso_blob_file() {
        let mut ctx = DeviceContext::new(ScriptedTransport::new(), SecurityVersion::V2);
        let mut store = MemoryArtifacts::new();
        let inv = Invocation::new().with("perso_blob", "nope").with("output", "cert");
        let err = run_validate_and_sign(&mut ctx, &mut store, &HothConfig::default(), &inv).unwrap_err();
        assert_eq!(err.stage, Stage::ResolveParameters);
        assert_eq!(
            err.kind,
            ErrorKind::SourceRead {
                path: "nope".to_owned(),
                reason: "nope".to_owned(),
            }
        );
        assert!(ctx.transport_mut().sent().is_empty());
    }
}
