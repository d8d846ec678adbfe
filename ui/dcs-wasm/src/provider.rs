//! EIP-1193 provider backed by the injected `window.ethereum` object.

use std::rc::Rc;

use async_trait::async_trait;
use dcs_api_types::{Address, Bytes, ProviderEvent, TxHash, TxReceipt};
use dcs_contract_client::{CallRequest, ContractError, ContractResult, WalletProvider};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Object, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const NO_PARAMS: [(); 0] = [];

pub struct Eip1193Provider {
    ethereum: Object,
    poll_interval_ms: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl Eip1193Provider {
    /// Look up `window.ethereum`. `None` when no wallet extension injected one.
    pub fn detect(window: &web_sys::Window, poll_interval_ms: u32) -> Option<Self> {
        let ethereum = Reflect::get(window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self {
            ethereum: ethereum.dyn_into().ok()?,
            poll_interval_ms,
        })
    }

    async fn request<T: Serialize + ?Sized>(&self, method: &str, params: &T) -> ContractResult<JsValue> {
        debug!(method, "provider request");
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let params = params
            .serialize(&serializer)
            .map_err(|err| ContractError::Transport(err.to_string()))?;

        let args = Object::new();
        Reflect::set(&args, &"method".into(), &method.into()).map_err(js_transport)?;
        Reflect::set(&args, &"params".into(), &params).map_err(js_transport)?;

        let request: Function = Reflect::get(&self.ethereum, &"request".into())
            .map_err(js_transport)?
            .dyn_into()
            .map_err(|_| ContractError::Transport("provider has no request()".into()))?;
        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(rpc_error)?
            .dyn_into()
            .map_err(|_| ContractError::Transport("request() did not return a promise".into()))?;

        JsFuture::from(promise).await.map_err(rpc_error)
    }

    async fn request_as<T, R>(&self, method: &str, params: &T) -> ContractResult<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let value = self.request(method, params).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|err| ContractError::Decode(format!("{method}: {err}")))
    }

    fn listen(&self, event: &str, callback: &Closure<dyn FnMut(JsValue)>) -> Result<(), JsValue> {
        let on: Function = Reflect::get(&self.ethereum, &"on".into())?.dyn_into()?;
        on.call2(&self.ethereum, &event.into(), callback.as_ref().unchecked_ref())?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn request_accounts(&self) -> ContractResult<Vec<Address>> {
        self.request_as("eth_requestAccounts", &NO_PARAMS).await
    }

    async fn chain_id(&self) -> ContractResult<u64> {
        let raw: String = self.request_as("eth_chainId", &NO_PARAMS).await?;
        parse_quantity(&raw)
    }

    async fn call(&self, request: &CallRequest) -> ContractResult<Bytes> {
        self.request_as("eth_call", &(request, "latest")).await
    }

    async fn send_transaction(&self, request: &CallRequest) -> ContractResult<TxHash> {
        self.request_as("eth_sendTransaction", &[request]).await
    }

    async fn wait_for_transaction(&self, hash: TxHash) -> ContractResult<TxReceipt> {
        loop {
            let raw: Option<RawReceipt> = self.request_as("eth_getTransactionReceipt", &[hash]).await?;
            match raw {
                Some(raw) => return receipt_from_raw(raw),
                None => TimeoutFuture::new(self.poll_interval_ms).await,
            }
        }
    }

    fn subscribe(&self, listener: Box<dyn Fn(ProviderEvent)>) {
        let listener: Rc<dyn Fn(ProviderEvent)> = Rc::from(listener);

        let on_accounts = {
            let listener = listener.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |accounts: JsValue| {
                match serde_wasm_bindgen::from_value::<Vec<Address>>(accounts) {
                    Ok(accounts) => listener(ProviderEvent::AccountsChanged(accounts)),
                    Err(err) => warn!(error = %err, "unreadable accountsChanged payload"),
                }
            })
        };
        let on_chain = Closure::<dyn FnMut(JsValue)>::new(move |chain: JsValue| {
            let parsed = chain
                .as_string()
                .ok_or_else(|| ContractError::Decode("chain id is not a string".into()))
                .and_then(|raw| parse_quantity(&raw));
            match parsed {
                Ok(chain_id) => listener(ProviderEvent::ChainChanged(chain_id)),
                Err(err) => warn!(error = %err, "unreadable chainChanged payload"),
            }
        });

        for (event, callback) in [("accountsChanged", &on_accounts), ("chainChanged", &on_chain)] {
            if let Err(err) = self.listen(event, callback) {
                warn!(event, error = ?err, "provider does not support events");
            }
        }
        on_accounts.forget();
        on_chain.forget();
    }
}

/// Map a rejected provider promise (`{ code, message }`) to a contract error.
fn rpc_error(value: JsValue) -> ContractError {
    let code = Reflect::get(&value, &"code".into())
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&value, &"message".into())
        .ok()
        .and_then(|m| m.as_string());

    match (code, message) {
        (Some(code), Some(message)) => ContractError::from_rpc(code as i64, message),
        (None, Some(message)) => ContractError::Transport(message),
        _ => js_transport(value),
    }
}

fn js_transport(value: JsValue) -> ContractError {
    ContractError::Transport(format!("{value:?}"))
}

/// Parse a JSON-RPC hex quantity such as `0x7a69`.
fn parse_quantity(raw: &str) -> ContractResult<u64> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ContractError::Decode(format!("quantity `{raw}` lacks 0x prefix")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|err| ContractError::Decode(format!("quantity `{raw}`: {err}")))
}

fn receipt_from_raw(raw: RawReceipt) -> ContractResult<TxReceipt> {
    let block_number = raw.block_number.as_deref().map(parse_quantity).transpose()?;
    // Pre-Byzantium receipts carry no status; treat them as successful.
    let success = match raw.status.as_deref() {
        Some(status) => parse_quantity(status)? == 1,
        None => true,
    };
    Ok(TxReceipt {
        transaction_hash: raw.transaction_hash,
        block_number,
        success,
    })
}
