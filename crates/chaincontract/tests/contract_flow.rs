//! End-to-end flows against a scripted in-memory node.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chaincontract::{
    BlockPosition, CallOptions, Contract, ContractError, ContractInfo, ContractTransport, DecodedLog,
    LogFilter, LogHandler, LogOptions, LogPoller, NormalizedValue, SendOptions, TransactionInfo,
    TransportError, CATCH_ALL_CHANNEL,
};
use chaincontract_core::{
    CallContractRequest, CallContractResult, ContractLogEntry, ExecutionResult, LogEntry, RawLog,
    ReceiptHeader, SendToContractRequest, SendToContractResult, TransactionReceipt,
    WaitForLogsRequest, WaitForLogsResult,
};
use chaincontract_core::error::MethodIndexKind;
use tokio::sync::{mpsc, watch};

const TOKEN_ADDRESS: &str = "bd3a3d87ac9e3a12b4ed5e5d4e2c4c4b8e1f0a2c";
const ALICE: &str = "17e7888aa7412a735f336d2f6d784caefabb6fa3";
const BOB: &str = "dcd32b87270aeb980333213da2549c9907e09e94";
const TRANSFER_TOPIC: &str = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

const TOKEN_JSON: &str = r#"{
    "address": "bd3a3d87ac9e3a12b4ed5e5d4e2c4c4b8e1f0a2c",
    "sender": "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW",
    "abi": [
        {"type": "function", "name": "balanceOf", "constant": true,
         "inputs": [{"name": "owner", "type": "address"}],
         "outputs": [{"name": "", "type": "uint256"}]},
        {"type": "function", "name": "transfer", "stateMutability": "nonpayable",
         "inputs": [{"name": "to", "type": "address"}, {"name": "value", "type": "uint256"}],
         "outputs": [{"name": "", "type": "bool"}]},
        {"type": "event", "name": "Transfer", "anonymous": false,
         "inputs": [{"name": "from", "type": "address", "indexed": true},
                    {"name": "to", "type": "address", "indexed": true},
                    {"name": "value", "type": "uint256", "indexed": false}]}
    ]
}"#;

// ─── Scripted node ───────────────────────────────────────────────────────────

/// In-memory node. Each queue is consumed front to back; the transaction
/// and receipt queues repeat their last element once drained, and an empty
/// log queue long-polls forever.
#[derive(Default)]
struct MockNode {
    call_results: Mutex<VecDeque<CallContractResult>>,
    send_results: Mutex<VecDeque<SendToContractResult>>,
    transactions: Mutex<VecDeque<Result<TransactionInfo, String>>>,
    receipts: Mutex<VecDeque<Option<TransactionReceipt>>>,
    log_rounds: Mutex<VecDeque<Result<WaitForLogsResult, String>>>,

    calls: Mutex<Vec<CallContractRequest>>,
    sends: Mutex<Vec<SendToContractRequest>>,
    log_requests: Mutex<Vec<WaitForLogsRequest>>,
    requests: AtomicUsize,
}

impl MockNode {
    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn push_call(&self, output: &str, excepted: &str) {
        self.call_results.lock().unwrap().push_back(CallContractResult {
            address: TOKEN_ADDRESS.into(),
            execution_result: ExecutionResult {
                excepted: excepted.into(),
                output: output.into(),
                ..Default::default()
            },
            transaction_receipt: None,
        });
    }

    fn push_confirmations(&self, counts: &[i64]) {
        let mut txs = self.transactions.lock().unwrap();
        for &confirmations in counts {
            txs.push_back(Ok(TransactionInfo {
                txid: "t1".into(),
                confirmations,
                ..Default::default()
            }));
        }
    }

    fn push_log_round(&self, entries: Vec<LogEntry>, nextblock: u64) {
        let count = entries.len() as u64;
        self.log_rounds.lock().unwrap().push_back(Ok(WaitForLogsResult {
            entries,
            count,
            nextblock: Some(nextblock),
        }));
    }
}

fn pop_or_repeat<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut q = queue.lock().unwrap();
    if q.len() > 1 {
        q.pop_front()
    } else {
        q.front().cloned()
    }
}

#[async_trait]
impl ContractTransport for MockNode {
    async fn call_contract(&self, req: CallContractRequest) -> Result<CallContractResult, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(req);
        self.call_results
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no scripted call".into()))
    }

    async fn send_to_contract(&self, req: SendToContractRequest) -> Result<SendToContractResult, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.sends.lock().unwrap().push(req);
        self.send_results
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no scripted send".into()))
    }

    async fn get_transaction(&self, _txid: &str) -> Result<TransactionInfo, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match pop_or_repeat(&self.transactions) {
            Some(Ok(tx)) => Ok(tx),
            Some(Err(e)) => Err(TransportError::Other(e)),
            None => Err(TransportError::Other("no scripted transaction".into())),
        }
    }

    async fn get_transaction_receipt(&self, _txid: &str) -> Result<Option<TransactionReceipt>, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(pop_or_repeat(&self.receipts).flatten())
    }

    async fn wait_for_logs(&self, req: WaitForLogsRequest) -> Result<WaitForLogsResult, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.log_requests.lock().unwrap().push(req);
        let next = self.log_rounds.lock().unwrap().pop_front();
        match next {
            Some(Ok(round)) => Ok(round),
            Some(Err(e)) => Err(TransportError::Http(e)),
            None => futures::future::pending().await,
        }
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn word(hex: &str) -> String {
    format!("{hex:0>64}")
}

fn uint_word(v: u128) -> String {
    format!("{v:064x}")
}

fn transfer_log(from: &str, to: &str, value: u128) -> RawLog {
    RawLog {
        address: TOKEN_ADDRESS.into(),
        topics: vec![TRANSFER_TOPIC.into(), word(from), word(to)],
        data: uint_word(value),
    }
}

fn unknown_log() -> RawLog {
    RawLog {
        address: TOKEN_ADDRESS.into(),
        topics: vec![word("ff")],
        data: String::new(),
    }
}

fn log_entry(log: RawLog, block: u64) -> LogEntry {
    LogEntry {
        receipt: ReceiptHeader {
            block_number: block,
            contract_address: TOKEN_ADDRESS.into(),
            ..Default::default()
        },
        address: Some(log.address),
        topics: log.topics,
        data: log.data,
    }
}

fn receipt(logs: Vec<RawLog>) -> TransactionReceipt {
    TransactionReceipt {
        header: ReceiptHeader {
            block_hash: "b1".into(),
            block_number: 1_200,
            transaction_hash: "t1".into(),
            contract_address: TOKEN_ADDRESS.into(),
            ..Default::default()
        },
        log: logs,
    }
}

fn setup() -> (Contract, Arc<MockNode>) {
    let node = Arc::new(MockNode::default());
    let contract = Contract::builder()
        .info(ContractInfo::from_json(TOKEN_JSON).unwrap())
        .transport(node.clone())
        .confirm_poll_interval_ms(1)
        .build()
        .unwrap();
    (contract, node)
}

fn addr(a: &str) -> NormalizedValue {
    NormalizedValue::Address(a.into())
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_method_makes_no_transport_call() {
    let (contract, node) = setup();

    let err = contract.call("mint", &[], CallOptions::default()).await.unwrap_err();
    assert!(matches!(err, ContractError::UnknownMethod { index: MethodIndexKind::Call, .. }));

    let err = contract.send("mint", &[], SendOptions::default()).await.unwrap_err();
    assert!(matches!(err, ContractError::UnknownMethod { index: MethodIndexKind::Send, .. }));

    assert!(contract.encode_params("mint", &[]).is_err());
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn constant_method_cannot_be_sent() {
    let (contract, node) = setup();
    let err = contract
        .send("balanceOf", &[addr(ALICE)], SendOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown method 'balanceOf' (not in send index)");
    assert_eq!(node.request_count(), 0);
}

#[tokio::test]
async fn mutating_method_can_still_be_called() {
    let (contract, node) = setup();
    node.push_call(&uint_word(1), "None");
    let result = contract
        .call("transfer", &[addr(BOB), NormalizedValue::Uint(100)], CallOptions::default())
        .await
        .unwrap();
    assert_eq!(result.outputs, vec![NormalizedValue::Bool(true)]);
    assert_eq!(node.request_count(), 1);
}

#[tokio::test]
async fn call_decodes_outputs_and_uses_default_sender() {
    let (contract, node) = setup();
    node.push_call(&uint_word(100), "None");

    let result = contract
        .call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap();
    assert_eq!(result.outputs, vec![NormalizedValue::Uint(100)]);
    assert_eq!(result.first(), Some(&NormalizedValue::Uint(100)));

    let calls = node.calls.lock().unwrap();
    assert_eq!(calls[0].address, TOKEN_ADDRESS);
    assert_eq!(calls[0].datahex, format!("70a08231{}", word(ALICE)));
    assert_eq!(calls[0].sender.as_deref(), Some("qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW"));
}

#[tokio::test]
async fn explicit_sender_wins() {
    let (contract, node) = setup();
    node.push_call(&uint_word(1), "None");
    contract
        .raw_call("balanceOf", &[addr(ALICE)], CallOptions::default().sender("qOther"))
        .await
        .unwrap();
    assert_eq!(node.calls.lock().unwrap()[0].sender.as_deref(), Some("qOther"));
}

#[tokio::test]
async fn vm_exception_is_reverted_even_with_output() {
    let (contract, node) = setup();
    node.push_call(&uint_word(100), "Revert");

    let err = contract
        .call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_reverted());
    assert_eq!(err.to_string(), "Call exception: Revert");
}

#[tokio::test]
async fn raw_call_does_not_interpret_exceptions() {
    let (contract, node) = setup();
    node.push_call("", "OutOfGas");
    let raw = contract
        .raw_call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap();
    assert_eq!(raw.execution_result.excepted, "OutOfGas");
}

#[tokio::test]
async fn empty_output_decodes_to_empty_list() {
    let (contract, node) = setup();
    node.push_call("", "None");
    let result = contract
        .call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap();
    assert!(result.outputs.is_empty());
}

#[tokio::test]
async fn send_applies_configured_gas_defaults() {
    let (contract, node) = setup();
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW".into(),
        hash160: ALICE.into(),
    });

    let sent = contract
        .raw_send("transfer", &[addr(BOB), NormalizedValue::Uint(10)], SendOptions::default().amount(0.5))
        .await
        .unwrap();
    assert_eq!(sent.txid, "t1");

    let sends = node.sends.lock().unwrap();
    assert_eq!(sends[0].gas_limit, 200_000);
    assert_eq!(sends[0].gas_price, 0.000_000_4);
    assert_eq!(sends[0].amount, 0.5);
    assert!(sends[0].datahex.starts_with("a9059cbb"));
}

// ─── Confirmation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn confirm_reports_each_change_then_resolves() {
    let (contract, node) = setup();
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW".into(),
        hash160: ALICE.into(),
    });
    // first entry answers the lookup made by `send`
    node.push_confirmations(&[0, 0, 1, 1, 3]);
    node.receipts
        .lock()
        .unwrap()
        .push_back(Some(receipt(vec![transfer_log(ALICE, BOB, 10), unknown_log()])));

    let tx = contract
        .send("transfer", &[addr(BOB), NormalizedValue::Uint(10)], SendOptions::default())
        .await
        .unwrap();
    assert_eq!(tx.txid(), "t1");
    assert_eq!(tx.method, "transfer");
    assert_eq!(tx.transaction.confirmations, 0);

    let mut seen = Vec::new();
    let confirmed = tx
        .confirm_with_updates(3, |tx, r| seen.push((tx.confirmations, r.logs.len())))
        .await
        .unwrap();

    assert_eq!(seen, vec![(1, 2), (3, 2)]);
    assert_eq!(confirmed.rawlogs.len(), 2);
    assert_eq!(confirmed.logs.len(), confirmed.rawlogs.len());
    assert_eq!(confirmed.header.block_number, 1_200);

    let event = confirmed.logs[0].event().unwrap();
    assert_eq!(event.name, "Transfer");
    assert_eq!(event.field("to"), Some(&addr(BOB)));
    assert_eq!(event.field("value"), Some(&NormalizedValue::Uint(10)));
    assert!(matches!(confirmed.logs[1], DecodedLog::Unrecognized { .. }));
}

#[tokio::test]
async fn zero_target_waits_for_first_confirmation() {
    let (contract, node) = setup();
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: String::new(),
        hash160: String::new(),
    });
    node.push_confirmations(&[0, 0, 0, 2]);
    node.receipts.lock().unwrap().push_back(Some(receipt(vec![])));

    let tx = contract
        .send("transfer", &[addr(BOB), NormalizedValue::Uint(1)], SendOptions::default())
        .await
        .unwrap();
    let mut updates = 0;
    let confirmed = tx.confirm_with_updates(0, |_, _| updates += 1).await.unwrap();
    assert_eq!(updates, 1);
    assert!(confirmed.logs.is_empty());
}

#[tokio::test]
async fn confirm_waits_for_receipt_indexing() {
    let (contract, node) = setup();
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: String::new(),
        hash160: String::new(),
    });
    node.push_confirmations(&[0, 1]);
    {
        let mut receipts = node.receipts.lock().unwrap();
        receipts.push_back(None);
        receipts.push_back(Some(receipt(vec![transfer_log(ALICE, BOB, 1)])));
    }

    let tx = contract
        .send("transfer", &[addr(BOB), NormalizedValue::Uint(1)], SendOptions::default())
        .await
        .unwrap();
    let confirmed = tx.confirm(1).await.unwrap();
    assert_eq!(confirmed.logs[0].name(), Some("Transfer"));
}

#[tokio::test]
async fn confirm_propagates_transport_failure() {
    let (contract, node) = setup();
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: String::new(),
        hash160: String::new(),
    });
    node.push_confirmations(&[0]);
    node.transactions
        .lock()
        .unwrap()
        .push_back(Err("node went away".into()));

    let tx = contract
        .send("transfer", &[addr(BOB), NormalizedValue::Uint(1)], SendOptions::default())
        .await
        .unwrap();
    let err = tx.confirm(6).await.unwrap_err();
    assert!(err.is_transport());
}

// ─── Logs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn logs_default_to_contract_address() {
    let (contract, node) = setup();
    node.push_log_round(vec![], 10);
    node.push_log_round(vec![], 10);
    node.push_log_round(vec![], 10);

    contract.logs(LogOptions::default()).await.unwrap();
    contract
        .logs(LogOptions::default().filter(LogFilter {
            addresses: Some(vec![]),
            topics: None,
        }))
        .await
        .unwrap();
    contract
        .logs(
            LogOptions::default()
                .from_block(500)
                .minconf(2)
                .filter(LogFilter::default().topic(0, TRANSFER_TOPIC)),
        )
        .await
        .unwrap();

    let reqs = node.log_requests.lock().unwrap();
    let addresses = |i: usize| reqs[i].filter.as_ref().and_then(|f| f.addresses.clone());
    assert_eq!(addresses(0), Some(vec![TOKEN_ADDRESS.to_string()]));
    assert_eq!(addresses(1), Some(vec![]));
    assert_eq!(addresses(2), Some(vec![TOKEN_ADDRESS.to_string()]));
    assert_eq!(reqs[2].from, Some(BlockPosition::Number(500)));
    assert_eq!(reqs[2].minconf, Some(2));
    assert_eq!(
        reqs[2].filter.as_ref().and_then(|f| f.topics.clone()),
        Some(vec![Some(TRANSFER_TOPIC.to_string())])
    );
}

#[tokio::test]
async fn logs_decode_each_entry_independently() {
    let (contract, node) = setup();
    node.push_log_round(
        vec![log_entry(unknown_log(), 100), log_entry(transfer_log(ALICE, BOB, 7), 100)],
        101,
    );
    let logs = contract.logs(LogOptions::default()).await.unwrap();
    assert_eq!(logs.count, 2);
    assert_eq!(logs.nextblock, Some(101));
    assert!(matches!(logs.entries[0].event, DecodedLog::Unrecognized { .. }));
    assert_eq!(logs.entries[1].event.name(), Some("Transfer"));
}

/// Records the published cursor at the moment each entry is delivered.
struct CursorWatcher {
    cursor: Arc<Mutex<Option<watch::Receiver<BlockPosition>>>>,
    seen: Arc<Mutex<Vec<(BlockPosition, Option<String>)>>>,
}

#[async_trait]
impl LogHandler for CursorWatcher {
    async fn handle(&mut self, entry: ContractLogEntry) {
        let position = self
            .cursor
            .lock()
            .unwrap()
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or_default();
        self.seen
            .lock()
            .unwrap()
            .push((position, entry.event.name().map(str::to_string)));
    }
}

#[tokio::test]
async fn cursor_advances_only_after_delivery() {
    let (contract, node) = setup();
    node.push_log_round(
        vec![log_entry(transfer_log(ALICE, BOB, 1), 100), log_entry(unknown_log(), 100)],
        101,
    );
    node.push_log_round(vec![log_entry(transfer_log(BOB, ALICE, 2), 102)], 103);
    node.push_log_round(vec![], 99);

    let cursor = Arc::new(Mutex::new(None));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut poller = LogPoller::new(
        contract,
        CursorWatcher {
            cursor: cursor.clone(),
            seen: seen.clone(),
        },
        LogOptions::default(),
    );
    *cursor.lock().unwrap() = Some(poller.watch_cursor());

    assert_eq!(poller.poll_once().await.unwrap(), 2);
    assert_eq!(poller.cursor(), BlockPosition::Number(101));
    assert_eq!(poller.poll_once().await.unwrap(), 1);
    assert_eq!(poller.cursor(), BlockPosition::Number(103));
    // a lower nextblock is ignored
    assert_eq!(poller.poll_once().await.unwrap(), 0);
    assert_eq!(poller.cursor(), BlockPosition::Number(103));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (BlockPosition::Latest, Some("Transfer".to_string())),
            (BlockPosition::Latest, None),
            (BlockPosition::Number(101), Some("Transfer".to_string())),
        ]
    );

    let froms: Vec<_> = node.log_requests.lock().unwrap().iter().map(|r| r.from).collect();
    assert_eq!(
        froms,
        vec![
            Some(BlockPosition::Latest),
            Some(BlockPosition::Number(101)),
            Some(BlockPosition::Number(103)),
        ]
    );
}

#[tokio::test]
async fn spawned_loop_delivers_in_order_and_cancels() {
    let (contract, node) = setup();
    node.push_log_round(
        vec![
            log_entry(transfer_log(ALICE, BOB, 1), 100),
            log_entry(transfer_log(ALICE, BOB, 2), 100),
        ],
        101,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = contract.spawn_on_log(
        move |entry: ContractLogEntry| {
            let _ = tx.send(entry);
        },
        LogOptions::default().from_block(100),
    );

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    let value = |e: &ContractLogEntry| e.event.event().and_then(|ev| ev.field("value")).cloned();
    assert_eq!(value(&first), Some(NormalizedValue::Uint(1)));
    assert_eq!(value(&second), Some(NormalizedValue::Uint(2)));

    let mut cursor = sub.watch_cursor();
    while *cursor.borrow() != BlockPosition::Number(101) {
        cursor.changed().await.unwrap();
    }
    assert_eq!(sub.cursor(), BlockPosition::Number(101));

    // the second round is blocked in the long-poll; cancel must still return
    sub.cancel().await.unwrap();
    assert_eq!(node.log_requests.lock().unwrap()[0].from, Some(BlockPosition::Number(100)));
}

#[tokio::test]
async fn dropping_subscription_stops_loop() {
    let (contract, _node) = setup();
    let sub = contract.spawn_on_log(|_entry: ContractLogEntry| {}, LogOptions::default());
    let mut cursor = sub.watch_cursor();
    drop(sub);
    // the loop exits and drops its cursor sender
    assert!(cursor.changed().await.is_err());
}

#[tokio::test]
async fn transport_failure_ends_loop() {
    let (contract, node) = setup();
    node.log_rounds
        .lock()
        .unwrap()
        .push_back(Err("connection refused".into()));

    let sub = contract.spawn_on_log(|_entry: ContractLogEntry| {}, LogOptions::default());
    let err = sub.join().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn emitter_routes_by_event_type() {
    let (contract, node) = setup();
    node.push_log_round(
        vec![
            log_entry(transfer_log(ALICE, BOB, 5), 100),
            log_entry(unknown_log(), 100),
        ],
        101,
    );

    let feed = contract.log_emitter(LogOptions::default());
    let mut transfers = feed.subscribe("Transfer");
    let mut other = feed.subscribe(CATCH_ALL_CHANNEL);
    let (_emitter, sub) = feed.start();

    let t = transfers.recv().await.unwrap();
    assert_eq!(t.event.name(), Some("Transfer"));
    let o = other.recv().await.unwrap();
    assert!(o.event.event().is_none());
    assert!(transfers.try_recv().is_err());

    sub.cancel().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn emitter_feed_delivers_first_round_on_worker_threads() {
    for round in 0..50u64 {
        let (contract, node) = setup();
        node.push_log_round(vec![log_entry(transfer_log(ALICE, BOB, round as u128), 100)], 101);

        let feed = contract.log_emitter(LogOptions::default());
        let mut transfers = feed.subscribe("Transfer");
        let (_emitter, sub) = feed.start();

        let entry = tokio::time::timeout(std::time::Duration::from_secs(2), transfers.recv())
            .await
            .expect("first round was not republished")
            .unwrap();
        assert_eq!(
            entry.event.event().and_then(|e| e.field("value")).cloned(),
            Some(NormalizedValue::Uint(round as u128))
        );
        sub.cancel().await.unwrap();
    }
}

#[tokio::test]
async fn empty_round_keeps_cursor() {
    let (contract, node) = setup();
    node.push_log_round(vec![], 200);
    node.log_rounds
        .lock()
        .unwrap()
        .push_back(Ok(WaitForLogsResult::default()));
    node.push_log_round(vec![log_entry(transfer_log(ALICE, BOB, 1), 200)], 201);

    let mut poller = LogPoller::new(contract, |_entry: ContractLogEntry| {}, LogOptions::default());
    poller.poll_once().await.unwrap();
    assert_eq!(poller.cursor(), BlockPosition::Number(200));
    assert_eq!(poller.poll_once().await.unwrap(), 0);
    assert_eq!(poller.cursor(), BlockPosition::Number(200));
    assert_eq!(poller.poll_once().await.unwrap(), 1);
    assert_eq!(poller.cursor(), BlockPosition::Number(201));

    let froms: Vec<_> = node.log_requests.lock().unwrap().iter().map(|r| r.from).collect();
    assert_eq!(froms[1], Some(BlockPosition::Number(200)));
    assert_eq!(froms[2], Some(BlockPosition::Number(200)));
}

// ─── Scenario ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn token_transfer_scenario() {
    let (contract, node) = setup();
    node.push_call(&uint_word(100), "None");
    node.send_results.lock().unwrap().push_back(SendToContractResult {
        txid: "t1".into(),
        sender: "qUbxboqjBRp96j3La8D1RYkyqx5uQbJPoW".into(),
        hash160: ALICE.into(),
    });
    node.push_confirmations(&[0, 1]);
    node.receipts
        .lock()
        .unwrap()
        .push_back(Some(receipt(vec![transfer_log(ALICE, BOB, 10)])));
    node.push_call(&uint_word(90), "None");

    let before = contract
        .call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap();
    assert_eq!(before.first(), Some(&NormalizedValue::Uint(100)));

    let tx = contract
        .send("transfer", &[addr(BOB), NormalizedValue::Uint(10)], SendOptions::default())
        .await
        .unwrap();
    let confirmed = tx.confirm(1).await.unwrap();
    let event = confirmed.logs[0].event().unwrap();
    assert_eq!(event.field("from"), Some(&addr(ALICE)));
    assert_eq!(event.field("value"), Some(&NormalizedValue::Uint(10)));

    let after = contract
        .call("balanceOf", &[addr(ALICE)], CallOptions::default())
        .await
        .unwrap();
    assert_eq!(after.first(), Some(&NormalizedValue::Uint(90)));
}
