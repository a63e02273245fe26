//! Withdraw instruction handler.
//!
//! Returns a user's entire stake from the vault. Partial withdrawals are not
//! supported.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Withdrawn;
use crate::guard;
use crate::settlement;
use crate::state::{StakePool, StakerRegistry, UserStake};

/// Accounts required for withdrawing.
///
/// When the user is not the last registry member, the last member's
/// `UserStake` must be passed as the first remaining account (writable) so
/// its registry slot can follow the swap.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The user withdrawing tokens.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = staking_vault,
        has_one = staking_mint,
        has_one = staker_registry
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The pool's staker registry.
    #[account(
        mut,
        seeds = [STAKER_REGISTRY_SEED, stake_pool.key().as_ref()],
        bump = staker_registry.bump
    )]
    pub staker_registry: Account<'info, StakerRegistry>,

    /// User's stake account.
    #[account(
        mut,
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump = user_stake.bump,
        constraint = user_stake.owner == user.key() @ StakingError::Unauthorized,
        constraint = user_stake.stake_pool == stake_pool.key() @ StakingError::StakePoolMismatch
    )]
    pub user_stake: Account<'info, UserStake>,

    /// The staking token mint.
    pub staking_mint: Account<'info, Mint>,

    /// User's token account for receiving the stake.
    #[account(
        mut,
        constraint = user_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool's staking vault.
    #[account(mut)]
    pub staking_vault: Account<'info, TokenAccount>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Withdraw the whole stake.
///
/// Rewards earned up to this slot are settled and stay harvestable.
///
/// # Arguments
/// * `ctx` - Withdraw accounts context
///
/// # Returns
/// Result indicating success or error
pub fn handler(mut ctx: Context<Withdraw>) -> Result<()> {
    guard::enter(&mut ctx.accounts.stake_pool)?;
    let result = withdraw(&mut ctx);
    ctx.accounts.stake_pool.unlock();
    result
}

fn withdraw(ctx: &mut Context<Withdraw>) -> Result<()> {
    let clock = Clock::get()?;
    let stake_pool_key = ctx.accounts.stake_pool.key();

    let moved_info = ctx.remaining_accounts.first();
    let mut moved = match moved_info {
        Some(info) => {
            require_keys_neq!(
                info.key(),
                ctx.accounts.user_stake.key(),
                StakingError::StakerAccountsMismatch
            );
            Some(UserStake::load(info, &stake_pool_key)?)
        }
        None => None,
    };

    let amount = settlement::withdraw(
        &mut ctx.accounts.stake_pool,
        &mut ctx.accounts.staker_registry,
        &mut ctx.accounts.user_stake,
        moved.as_mut(),
        clock.slot,
    )?;

    if let (Some(info), Some(moved)) = (moved_info, moved.as_ref()) {
        moved.store(info)?;
    }

    // Return the stake from the vault using the pool PDA signer
    let staking_mint_key = ctx.accounts.stake_pool.staking_mint;
    let seeds = &[
        STAKE_POOL_SEED,
        staking_mint_key.as_ref(),
        &[ctx.accounts.stake_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.staking_vault.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: ctx.accounts.stake_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)?;

    let user_stake = &ctx.accounts.user_stake;
    let stake_pool = &ctx.accounts.stake_pool;

    msg!("Withdrew {} tokens", amount);
    msg!("Pending rewards: {}", user_stake.pending_rewards);
    msg!("Remaining stakers: {}", ctx.accounts.staker_registry.len());

    emit!(Withdrawn {
        owner: user_stake.owner,
        amount,
        pending_rewards: user_stake.pending_rewards,
        total_staked: stake_pool.total_staked,
        slot: clock.slot,
    });

    Ok(())
}
