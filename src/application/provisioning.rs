//! Provisioning-log retrieval and validate-and-sign.
//!
//! These use raw host commands: the 12-byte request goes out as is, with no
//! security v2 parameter framing and no challenge nonce.

use zerocopy::{FromBytes, IntoBytes};

use super::context::DeviceContext;
use super::errors::{AtStage, ErrorKind, Operation, OperationError, Stage};
use crate::config::ProvisioningConfig;
use crate::domain::provisioning::{
    crc32, ProvisioningLog, ProvisioningLogHeader, ProvisioningLogRequest, PROVISIONING_LOG_HEADER_LEN,
};
use crate::ports::transport::HostTransport;
use crate::protocol::security_v2::commands::HOTH_PRV_CMD_HOTH_PROVISIONING_LOG;
use crate::protocol::security_v2::{hoth_base_cmd, ResponseBuffer};

const PROVISIONING_LOG_CMD: u16 = hoth_base_cmd(HOTH_PRV_CMD_HOTH_PROVISIONING_LOG);

/// Read the provisioning log with default limits.
///
/// # Errors
/// See [`get_provisioning_log_with_config`].
pub fn get_provisioning_log<T: HostTransport>(ctx: &mut DeviceContext<T>) -> Result<ProvisioningLog, OperationError> {
    get_provisioning_log_with_config(ctx, &ProvisioningConfig::default())
}

/// Read the log header, then the content in chunks of at most `cfg.chunk_max_len`.
///
/// The header's checksum is carried through but not enforced here; call
/// [`ProvisioningLog::checksum_matches`] when it matters.
///
/// # Errors
/// * `UnexpectedResponseSize` when the header is short or a chunk reply is
///   not exactly header plus chunk.
/// * `SizeConstraintViolated` when `cfg.chunk_max_len` is zero (before any
///   traffic) or the header announces more than `cfg.log_max_len`.
/// * Version and dispatch failures.
pub fn get_provisioning_log_with_config<T: HostTransport>(
    ctx: &mut DeviceContext<T>,
    cfg: &ProvisioningConfig,
) -> Result<ProvisioningLog, OperationError> {
    const OP: Operation = Operation::GetProvisioningLog;
    ctx.ensure_supported(OP)?;
    if cfg.chunk_max_len == 0 {
        log::warn!("{OP}: chunk_max_len of 0 can never make progress");
        return Err(OperationError::new(
            OP,
            Stage::ResolveParameters,
            ErrorKind::SizeConstraintViolated("chunk_max_len must be non-zero".to_owned()),
        ));
    }

    let mut response = ResponseBuffer::with_capacity(PROVISIONING_LOG_HEADER_LEN + cfg.chunk_max_len);
    let request = ProvisioningLogRequest::read(0, 0);
    ctx.dispatcher()
        .raw(PROVISIONING_LOG_CMD, request.as_bytes(), &mut response)
        .at(OP, Stage::Dispatch)?;
    let (header, _) = ProvisioningLogHeader::read_from_prefix(response.filled()).map_err(|_| {
        OperationError::new(
            OP,
            Stage::Decode,
            ErrorKind::UnexpectedResponseSize {
                expected: PROVISIONING_LOG_HEADER_LEN,
                actual: response.used(),
            },
        )
    })?;

    let total = usize::from(header.size.get());
    if total > cfg.log_max_len {
        log::warn!("{OP}: log of {total} bytes exceeds maximum {}", cfg.log_max_len);
        return Err(OperationError::new(
            OP,
            Stage::Validate,
            ErrorKind::SizeConstraintViolated(format!(
                "provisioning log of {total} bytes exceeds maximum {}",
                cfg.log_max_len
            )),
        ));
    }
    log::debug!("{OP}: reading {total} bytes of log");

    let mut data = Vec::with_capacity(total);
    while data.len() < total {
        let chunk = (total - data.len()).min(cfg.chunk_max_len);
        // Both values are bounded by the u16 `header.size`.
        let request = ProvisioningLogRequest::read(data.len() as u16, chunk as u16);
        ctx.dispatcher()
            .raw(PROVISIONING_LOG_CMD, request.as_bytes(), &mut response)
            .at(OP, Stage::Dispatch)?;

        let expected = PROVISIONING_LOG_HEADER_LEN + chunk;
        if response.used() != expected {
            log::warn!(
                "{OP}: unexpected host command response size, expecting {expected}, got {}",
                response.used()
            );
            return Err(OperationError::new(
                OP,
                Stage::Decode,
                ErrorKind::UnexpectedResponseSize {
                    expected,
                    actual: response.used(),
                },
            ));
        }
        data.extend_from_slice(&response.filled()[PROVISIONING_LOG_HEADER_LEN..]);
    }

    Ok(ProvisioningLog { header, data })
}

/// Submit a personalization blob for validation with default limits.
///
/// # Errors
/// See [`validate_and_sign_with_config`].
pub fn validate_and_sign<T: HostTransport>(
    ctx: &mut DeviceContext<T>,
    perso_blob: &[u8],
) -> Result<Vec<u8>, OperationError> {
    validate_and_sign_with_config(ctx, perso_blob, &ProvisioningConfig::default())
}

/// Ask the device to validate `perso_blob` and return the certificate it signs.
///
/// Only the blob's length and CRC-32 travel in the request.
///
/// # Errors
/// * `SizeConstraintViolated` when the blob length does not fit the
///   request's `u16` size or the certificate exceeds `cfg.cert_max_len`.
/// * Version and dispatch failures.
pub fn validate_and_sign_with_config<T: HostTransport>(
    ctx: &mut DeviceContext<T>,
    perso_blob: &[u8],
    cfg: &ProvisioningConfig,
) -> Result<Vec<u8>, OperationError> {
    const OP: Operation = Operation::ValidateAndSign;
    ctx.ensure_supported(OP)?;

    let size = u16::try_from(perso_blob.len()).map_err(|_| {
        OperationError::new(
            OP,
            Stage::Encode,
            ErrorKind::SizeConstraintViolated(format!(
                "perso blob of {} bytes does not fit the request size field",
                perso_blob.len()
            )),
        )
    })?;
    let request = ProvisioningLogRequest::validate_and_sign(size, crc32(perso_blob));

    // One spare byte so an over-long certificate reaches the size check
    // instead of overflowing the buffer.
    let mut response = ResponseBuffer::with_capacity(cfg.cert_max_len + 1);
    let used = ctx
        .dispatcher()
        .raw(PROVISIONING_LOG_CMD, request.as_bytes(), &mut response)
        .at(OP, Stage::Dispatch)?;
    if used > cfg.cert_max_len {
        log::warn!("{OP}: bytes returned {used} > maximum certificate size {}", cfg.cert_max_len);
        return Err(OperationError::new(
            OP,
            Stage::Validate,
            ErrorKind::SizeConstraintViolated(format!(
                "certificate of {used} bytes exceeds maximum {}",
                cfg.cert_max_len
            )),
        ));
    }
    Ok(response.filled().to_vec())
}
