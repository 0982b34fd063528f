//! Receipt and log shaping: attach decoded events next to the raw records.

use chaincontract_core::{
    AbiCodec, ConfirmedReceipt, ContractLogEntry, ContractLogs, TransactionReceipt, WaitForLogsResult,
};

/// Decode every log of `receipt`.
///
/// `rawlogs` is the node's list unchanged and `logs` has the same length;
/// a log the ABI does not describe becomes `DecodedLog::Unrecognized`.
pub fn shape_receipt(codec: &dyn AbiCodec, receipt: &TransactionReceipt) -> ConfirmedReceipt {
    ConfirmedReceipt {
        header: receipt.header.clone(),
        logs: receipt.log.iter().map(|l| codec.try_decode_log(l)).collect(),
        rawlogs: receipt.log.clone(),
    }
}

/// Decode every entry of one `waitforlogs` round, keeping order.
pub fn shape_logs(codec: &dyn AbiCodec, result: WaitForLogsResult) -> ContractLogs {
    let entries = result
        .entries
        .into_iter()
        .map(|entry| {
            let event = codec.try_decode_log(&entry.raw_log());
            ContractLogEntry { entry, event }
        })
        .collect();
    ContractLogs {
        entries,
        count: result.count,
        nextblock: result.nextblock,
    }
}
