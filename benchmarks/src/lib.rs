//! Shared setup for the VTLS benchmarks.

use vtls_core::{CipherSuite, KeySchedule, RecordProtector, Result};
use vtls_crypto::CryptoProvider;

/// A key schedule with every input set, ready to derive.
pub fn ready_schedule(suite: CipherSuite) -> Result<KeySchedule> {
    let mut schedule = KeySchedule::new();
    schedule.set_cipher_suite(suite)?;
    schedule.set_client_random([0x01; 32])?;
    schedule.set_server_random([0x02; 32])?;
    schedule.set_pre_master_secret(vec![0x03; 48])?;
    schedule.add_handshake_message(b"\x01\x00\x00\x04bench");
    Ok(schedule)
}

/// A client-write protector and a peer that can read what it writes.
pub fn protector_pair(
    provider: &dyn CryptoProvider,
    suite: CipherSuite,
) -> Result<(RecordProtector, RecordProtector)> {
    let (writer, _) = ready_schedule(suite)?
        .derive_key_block(provider)?
        .into_protectors()?;
    let (reader, _) = ready_schedule(suite)?
        .derive_key_block(provider)?
        .into_protectors()?;
    Ok((writer, reader))
}
