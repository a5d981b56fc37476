//! Anchor account decoding for perpetuals position accounts.

use crate::domain::{FixedPoint, Pubkey, RawPositionAccount, RawSide, SignedFixedPoint};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Anchor discriminator length.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Serialized size of a position account, discriminator included.
pub const POSITION_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 32 * 4 + 8 * 2 + 1 + 8 * 4 + 16 + 8 + 1;

/// Account kinds understood by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Position,
}

impl AccountKind {
    fn anchor_name(&self) -> &'static str {
        match self {
            AccountKind::Position => "Position",
        }
    }

    /// `sha256("account:<Name>")[..8]`
    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        let hash = Sha256::digest(format!("account:{}", self.anchor_name()).as_bytes());
        let mut out = [0u8; DISCRIMINATOR_LEN];
        out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
        out
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("account data too short: {0} bytes")]
    TooShort(usize),
    #[error("discriminator mismatch: expected {expected}, got {actual}")]
    DiscriminatorMismatch { expected: String, actual: String },
    #[error("invalid side tag: {0}")]
    InvalidSide(u8),
    #[error("borsh decode error: {0}")]
    Borsh(#[from] std::io::Error),
}

/// Turns raw account bytes into typed records.
pub trait AccountDecoder: Send + Sync + std::fmt::Debug {
    fn decode(&self, kind: AccountKind, bytes: &[u8]) -> Result<RawPositionAccount, DecodeError>;
}

/// On-chain field layout, in borsh order.
#[derive(Debug, BorshSerialize, BorshDeserialize)]
struct PositionLayout {
    owner: [u8; 32],
    pool: [u8; 32],
    custody: [u8; 32],
    collateral_custody: [u8; 32],
    open_time: i64,
    update_time: i64,
    side: u8,
    price: u64,
    size_usd: u64,
    collateral_usd: u64,
    realised_pnl_usd: i64,
    cumulative_interest_snapshot: u128,
    locked_amount: u64,
    bump: u8,
}

impl TryFrom<PositionLayout> for RawPositionAccount {
    type Error = DecodeError;

    fn try_from(layout: PositionLayout) -> Result<Self, Self::Error> {
        let side = RawSide::from_tag(layout.side).ok_or(DecodeError::InvalidSide(layout.side))?;
        Ok(RawPositionAccount {
            owner: Pubkey::new_from_array(layout.owner),
            pool: Pubkey::new_from_array(layout.pool),
            custody: Pubkey::new_from_array(layout.custody),
            collateral_custody: Pubkey::new_from_array(layout.collateral_custody),
            open_time: layout.open_time,
            update_time: layout.update_time,
            side,
            price: FixedPoint::from_raw(layout.price),
            size_usd: FixedPoint::from_raw(layout.size_usd),
            collateral_usd: FixedPoint::from_raw(layout.collateral_usd),
            realised_pnl_usd: SignedFixedPoint::from_raw(layout.realised_pnl_usd),
            cumulative_interest_snapshot: layout.cumulative_interest_snapshot,
            locked_amount: layout.locked_amount,
            bump: layout.bump,
        })
    }
}

/// Decoder for the Jupiter Perpetuals `Position` account.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerpsPositionDecoder;

impl PerpsPositionDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AccountDecoder for PerpsPositionDecoder {
    fn decode(&self, kind: AccountKind, bytes: &[u8]) -> Result<RawPositionAccount, DecodeError> {
        if bytes.len() < DISCRIMINATOR_LEN {
            return Err(DecodeError::TooShort(bytes.len()));
        }

        let (disc, mut body) = bytes.split_at(DISCRIMINATOR_LEN);
        let expected = kind.discriminator();
        if disc != expected {
            return Err(DecodeError::DiscriminatorMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(disc),
            });
        }

        if bytes.len() < POSITION_ACCOUNT_LEN {
            return Err(DecodeError::TooShort(bytes.len()));
        }

        // Trailing padding after `bump` is ignored.
        let layout = PositionLayout::deserialize(&mut body)?;
        RawPositionAccount::try_from(layout)
    }
}

/// Serialize a position into account bytes, discriminator included.
pub fn encode_position(position: &RawPositionAccount) -> std::io::Result<Vec<u8>> {
    let layout = PositionLayout {
        owner: position.owner.to_bytes(),
        pool: position.pool.to_bytes(),
        custody: position.custody.to_bytes(),
        collateral_custody: position.collateral_custody.to_bytes(),
        open_time: position.open_time,
        update_time: position.update_time,
        side: position.side.tag(),
        price: position.price.raw(),
        size_usd: position.size_usd.raw(),
        collateral_usd: position.collateral_usd.raw(),
        realised_pnl_usd: position.realised_pnl_usd.raw(),
        cumulative_interest_snapshot: position.cumulative_interest_snapshot,
        locked_amount: position.locked_amount,
        bump: position.bump,
    };

    let mut out = AccountKind::Position.discriminator().to_vec();
    layout.serialize(&mut out)?;
    Ok(out)
}
