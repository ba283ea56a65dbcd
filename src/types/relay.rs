use alloy::{
    primitives::{B256, ChainId, U256, keccak256},
    sol,
    sol_types::SolValue,
};
use serde::{Deserialize, Serialize};

/// Correlation key for one relay.
///
/// The key is a content hash of the relay's immutable terms bound to its
/// destination chain, so deposit, fill and slow fill events observed by
/// independent RPC queries all reduce to the same key.
pub type RelayKey = B256;

sol! {
    /// The immutable terms defining one relay, mirroring the on-chain relay
    /// data tuple. Participants and tokens are `bytes32` so the same shape
    /// covers EVM addresses (left-padded) and SVM public keys.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct RelayTerms {
        /// Account that funded the deposit on the origin chain.
        bytes32 depositor;
        /// Account receiving the output tokens on the destination chain.
        bytes32 recipient;
        /// Relayer with exclusive fill rights until the exclusivity deadline,
        /// or zero for an open relay.
        bytes32 exclusiveRelayer;
        /// Token deposited on the origin chain.
        bytes32 inputToken;
        /// Token delivered on the destination chain.
        bytes32 outputToken;
        /// Amount deposited on the origin chain.
        uint256 inputAmount;
        /// Amount owed to the recipient on the destination chain.
        uint256 outputAmount;
        /// Chain the deposit was made on.
        uint256 originChainId;
        /// Sequential id assigned to the deposit by the origin spoke pool.
        uint256 depositId;
        /// Timestamp after which the relay can no longer be filled.
        uint32 fillDeadline;
        /// Timestamp until which only the exclusive relayer may fill.
        uint32 exclusivityDeadline;
        /// Arbitrary message forwarded to the recipient on fill.
        bytes message;
    }
}

impl RelayTerms {
    /// Hash of the relay terms bound to a destination chain.
    pub fn relay_key(&self, destination_chain_id: ChainId) -> RelayKey {
        keccak256((self.clone(), U256::from(destination_chain_id)).abi_encode())
    }
}

/// Settlement lifecycle state of a single relay.
///
/// The discriminants mirror the on-chain fill status mapping. The state only
/// moves forward: `Filled` is terminal and a slow fill request can never
/// follow a fill for the same relay. That ordering is enforced by the
/// protocol itself and is relied upon here, not re-validated.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FillStatus {
    /// No fill activity observed for the relay.
    #[default]
    Unfilled = 0,
    /// A slow fill was requested and is pending.
    RequestedSlowFill = 1,
    /// The relay was filled.
    Filled = 2,
}

impl FillStatus {
    /// Whether the relay reached its terminal state.
    pub const fn is_filled(&self) -> bool {
        matches!(self, Self::Filled)
    }
}

/// A fill status byte outside the on-chain mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid fill status discriminant {0}")]
pub struct InvalidFillStatus(pub u8);

impl TryFrom<u8> for FillStatus {
    type Error = InvalidFillStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unfilled),
            1 => Ok(Self::RequestedSlowFill),
            2 => Ok(Self::Filled),
            other => Err(InvalidFillStatus(other)),
        }
    }
}
