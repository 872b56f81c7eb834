use crate::{AccountId, Network};

/// Explicit configuration handed to a ledger client at construction.  Nothing about the network
/// or operator account is process-wide state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct LedgerClientConfig {
    /// Specify the network that DIDs are created on and resolved from.
    #[cfg_attr(
        feature = "clap",
        arg(env = "HEDERA_NETWORK", long, value_name = "NETWORK", default_value = "testnet")
    )]
    pub network: Network,
    /// Specify the operator account that pays for submitted transactions, e.g. "0.0.1234".
    #[cfg_attr(
        feature = "clap",
        arg(env = "HEDERA_OPERATOR_ACCOUNT_ID", long, value_name = "ACCOUNT_ID")
    )]
    pub operator_account_id: AccountId,
    /// Optional simulated network latency, applied to every ledger call before it does any work.
    #[cfg_attr(feature = "clap", arg(skip))]
    pub simulated_latency_o: Option<std::time::Duration>,
}

impl LedgerClientConfig {
    pub fn new(network: Network, operator_account_id: AccountId) -> Self {
        Self {
            network,
            operator_account_id,
            simulated_latency_o: None,
        }
    }
    pub fn with_simulated_latency(mut self, simulated_latency: std::time::Duration) -> Self {
        self.simulated_latency_o = Some(simulated_latency);
        self
    }
}
