//! Deposit instruction handler.
//!
//! Pulls stake tokens the user has delegated to the pool into the vault.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Deposited;
use crate::guard;
use crate::settlement;
use crate::state::{StakePool, StakerRegistry, UserStake};

/// Accounts required for depositing.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The user staking tokens.
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

    /// User's stake account (created on first deposit).
    #[account(
        init_if_needed,
        payer = user,
        space = UserStake::LEN,
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_stake: Account<'info, UserStake>,

    /// The staking token mint.
    pub staking_mint: Account<'info, Mint>,

    /// User's token account for the staking token. The pool must be its
    /// delegate for at least the deposit amount.
    #[account(
        mut,
        constraint = user_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Pool's staking vault.
    #[account(mut)]
    pub staking_vault: Account<'info, TokenAccount>,

    /// System program.
    pub system_program: Program<'info, System>,

    /// Token program.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar.
    pub rent: Sysvar<'info, Rent>,
}

/// Deposit tokens into the pool.
///
/// # Arguments
/// * `ctx` - Deposit accounts context
/// * `amount` - Amount of tokens to stake
///
/// # Returns
/// Result indicating success or error
pub fn handler(mut ctx: Context<Deposit>, amount: u64) -> Result<()> {
    guard::enter(&mut ctx.accounts.stake_pool)?;
    let result = deposit(&mut ctx, amount);
    ctx.accounts.stake_pool.unlock();
    result
}

fn deposit(ctx: &mut Context<Deposit>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let stake_pool_key = ctx.accounts.stake_pool.key();
    let allowance = delegated_allowance(&ctx.accounts.user_token_account, &stake_pool_key);

    // First deposit: bind the freshly created record to its owner
    if ctx.accounts.user_stake.owner == Pubkey::default() {
        let user_stake = &mut ctx.accounts.user_stake;
        user_stake.owner = ctx.accounts.user.key();
        user_stake.stake_pool = stake_pool_key;
        user_stake.bump = ctx.bumps.user_stake;
    }

    settlement::deposit(
        &mut ctx.accounts.stake_pool,
        &mut ctx.accounts.staker_registry,
        &mut ctx.accounts.user_stake,
        amount,
        allowance,
        clock.slot,
    )?;

    // Pull the tokens as the user's delegate
    let staking_mint_key = ctx.accounts.stake_pool.staking_mint;
    let seeds = &[
        STAKE_POOL_SEED,
        staking_mint_key.as_ref(),
        &[ctx.accounts.stake_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.user_token_account.to_account_info(),
        to: ctx.accounts.staking_vault.to_account_info(),
        authority: ctx.accounts.stake_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)?;

    let user_stake = &ctx.accounts.user_stake;
    let stake_pool = &ctx.accounts.stake_pool;

    msg!("Deposited {} tokens", amount);
    msg!("Total staked by user: {}", user_stake.staked_amount);
    msg!("Registry slot: {}", user_stake.registry_slot);

    emit!(Deposited {
        owner: user_stake.owner,
        amount,
        staked_amount: user_stake.staked_amount,
        total_staked: stake_pool.total_staked,
        reward_per_share: stake_pool.reward_per_share,
        slot: clock.slot,
    });

    Ok(())
}

/// Amount `spender` may move out of `token_account` as its delegate.
pub fn delegated_allowance(token_account: &TokenAccount, spender: &Pubkey) -> u64 {
    match token_account.delegate {
        COption::Some(delegate) if delegate == *spender => token_account.delegated_amount,
        _ => 0,
    }
}
