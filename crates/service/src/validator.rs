//! Transfer validator
//!
//! [`validate`] is a pure function over already-fetched chain state; every
//! check runs and every failure is reported. [`TransferValidator`] gathers
//! that state with read-only queries issued concurrently.

use futures::future::{join, join_all, OptionFuture};
use polar_types::{
	AccountData, AdapterError, ChainClient, Location, Pathway, SanctionsScreener,
	ScreeningVerdict, TransferError, TransferRequest, TransferResult, ValidationFailure,
	ValidationIssue, XcmFee,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::{with_timeout, BridgeContext};

const TRACING_TARGET: &str = "polar_service::validator";

/// Screening result for one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningOutcome {
	pub address: String,
	/// Verdict, or why the screening service could not answer
	pub result: Result<ScreeningVerdict, String>,
}

/// Beneficiary account data on one destination-side chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOutcome {
	pub chain: String,
	pub result: Result<AccountData, String>,
}

/// XCM fee and the sender's balance of the asset it is charged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBalance {
	pub fee: XcmFee,
	pub balance: u128,
}

/// State read on the sending side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceState {
	pub screening: ScreeningOutcome,
	/// Present for the parachain pathways when the parachain charges an XCM fee
	pub xcm_fee: Option<Result<FeeBalance, String>>,
}

/// State read on the receiving side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationState {
	pub screening: ScreeningOutcome,
	pub accounts: Vec<AccountOutcome>,
}

/// Check a transfer against the fetched state
///
/// `minimum_amount` is the destination token's minimum transfer amount.
pub fn validate(
	pathway: Pathway,
	amount: u128,
	minimum_amount: u128,
	source: &SourceState,
	destination: &DestinationState,
) -> Result<(), Vec<ValidationIssue>> {
	let failures: Vec<ValidationFailure> = check_amount(amount, minimum_amount)
		.into_iter()
		.chain(check_screening(&destination.screening))
		.chain(check_screening(&source.screening))
		.chain(check_sufficient_tokens(&destination.accounts))
		.chain(source.xcm_fee.as_ref().and_then(check_xcm_fee))
		.collect();

	if failures.is_empty() {
		return Ok(());
	}

	let kind = pathway.family();
	Err(failures
		.into_iter()
		.map(|failure| ValidationIssue::new(kind, failure))
		.collect())
}

/// A zero amount reports only the zero-amount failure
pub fn check_amount(amount: u128, minimum_amount: u128) -> Option<ValidationFailure> {
	if amount == 0 {
		Some(ValidationFailure::ZeroAmount)
	} else if amount < minimum_amount {
		Some(ValidationFailure::BelowMinimum {
			minimum: minimum_amount,
			amount,
		})
	} else {
		None
	}
}

/// An unreachable screening service blocks the transfer too
pub fn check_screening(outcome: &ScreeningOutcome) -> Option<ValidationFailure> {
	match &outcome.result {
		Ok(ScreeningVerdict::Allowed) => None,
		Ok(ScreeningVerdict::Blocked) => Some(ValidationFailure::SanctionedAddress {
			address: outcome.address.clone(),
		}),
		Err(reason) => Some(ValidationFailure::ScreeningUnavailable {
			address: outcome.address.clone(),
			reason: reason.clone(),
		}),
	}
}

/// Each chain is judged on its own; all must pass
pub fn check_sufficient_tokens(accounts: &[AccountOutcome]) -> Vec<ValidationFailure> {
	accounts
		.iter()
		.filter_map(|outcome| match &outcome.result {
			Ok(data) if data.is_sufficient() => None,
			Ok(_) => Some(ValidationFailure::InsufficientDestinationAccount {
				chain: outcome.chain.clone(),
			}),
			Err(reason) => Some(ValidationFailure::AccountQueryFailed {
				chain: outcome.chain.clone(),
				reason: reason.clone(),
			}),
		})
		.collect()
}

pub fn check_xcm_fee(fee: &Result<FeeBalance, String>) -> Option<ValidationFailure> {
	match fee {
		Ok(FeeBalance { fee, balance }) if fee.amount > *balance => {
			Some(ValidationFailure::XcmFeeUnaffordable {
				fee: fee.amount,
				balance: *balance,
			})
		},
		Ok(_) => None,
		Err(reason) => Some(ValidationFailure::XcmFeeQueryFailed {
			reason: reason.clone(),
		}),
	}
}

/// Gathers chain state and runs [`validate`]
#[derive(Debug)]
pub struct TransferValidator {
	screener: Arc<dyn SanctionsScreener>,
	rpc_timeout_ms: u64,
}

impl TransferValidator {
	pub fn new(screener: Arc<dyn SanctionsScreener>, rpc_timeout_ms: u64) -> Self {
		Self {
			screener,
			rpc_timeout_ms,
		}
	}

	/// Validate a routed request, returning every issue found
	pub async fn validate(
		&self,
		context: &BridgeContext,
		request: &TransferRequest,
		pathway: Pathway,
	) -> TransferResult<()> {
		let destination = context.location(&request.destination)?;
		let minimum_amount = destination.minimum_transfer_amount(&request.token);

		let accounts = self.sufficiency_targets(context, pathway, request)?;
		let fee_client = match pathway {
			Pathway::ParachainToAssetHub => Some(Arc::clone(context.client(&request.source)?)),
			Pathway::AssetHubToParachain
			| Pathway::EthereumToAssetHub
			| Pathway::AssetHubToEthereum => None,
		};

		let screening = join(
			self.screen(&request.beneficiary),
			self.screen(&request.source_account),
		);
		let sufficiency = join_all(
			accounts
				.iter()
				.map(|(chain, client)| self.account(chain, client, &request.beneficiary)),
		);
		let fee: OptionFuture<_> = fee_client
			.as_ref()
			.map(|client| self.fee_balance(client, &request.source_account))
			.into();

		let ((beneficiary_screening, source_screening), accounts, xcm_fee) =
			futures::join!(screening, sufficiency, fee);

		let source = SourceState {
			screening: source_screening,
			xcm_fee: xcm_fee.flatten(),
		};
		let destination = DestinationState {
			screening: beneficiary_screening,
			accounts,
		};

		validate(pathway, request.amount, minimum_amount, &source, &destination).map_err(
			|issues| {
				debug!(
					target: TRACING_TARGET,
					pathway = %pathway,
					issues = issues.len(),
					"Transfer failed validation"
				);
				TransferError::Validation(issues)
			},
		)
	}

	/// Chains whose beneficiary account must exist, minus those that opt out
	fn sufficiency_targets(
		&self,
		context: &BridgeContext,
		pathway: Pathway,
		request: &TransferRequest,
	) -> TransferResult<Vec<(String, Arc<dyn ChainClient>)>> {
		let hub = context.asset_hub()?;
		let chains: Vec<&Location> = match pathway {
			Pathway::EthereumToAssetHub => vec![hub],
			Pathway::AssetHubToEthereum => vec![],
			Pathway::AssetHubToParachain => vec![hub, context.location(&request.destination)?],
			Pathway::ParachainToAssetHub => vec![hub, context.location(&request.source)?],
		};

		chains
			.into_iter()
			.filter(|location| {
				!location
					.para_info
					.as_ref()
					.is_some_and(|info| info.skip_existential_deposit_check)
			})
			.map(|location| {
				context
					.client(&location.id)
					.map(|client| (location.name.clone(), Arc::clone(client)))
			})
			.collect()
	}

	async fn screen(&self, address: &str) -> ScreeningOutcome {
		let result = with_timeout(self.rpc_timeout_ms, self.screener.check(address))
			.await
			.map_err(|e| {
				warn!(target: TRACING_TARGET, address, error = %e, "Sanctions screening failed");
				e.to_string()
			});
		ScreeningOutcome {
			address: address.to_string(),
			result,
		}
	}

	async fn account(
		&self,
		chain: &str,
		client: &Arc<dyn ChainClient>,
		address: &str,
	) -> AccountOutcome {
		let result = with_timeout(self.rpc_timeout_ms, client.account_info(address))
			.await
			.map_err(|e| {
				warn!(target: TRACING_TARGET, chain, error = %e, "Unable to retrieve sufficients");
				e.to_string()
			});
		AccountOutcome {
			chain: chain.to_string(),
			result,
		}
	}

	/// `None` when the parachain charges no XCM fee
	async fn fee_balance(
		&self,
		client: &Arc<dyn ChainClient>,
		address: &str,
	) -> Option<Result<FeeBalance, String>> {
		let fee = match with_timeout(self.rpc_timeout_ms, client.xcm_fee()).await {
			Ok(fee) => fee,
			Err(AdapterError::UnsupportedOperation { .. }) => return None,
			Err(e) => return Some(Err(e.to_string())),
		};

		let balance = with_timeout(
			self.rpc_timeout_ms,
			client.fee_asset_balance(&fee.asset_id, address),
		)
		.await;

		Some(match balance {
			Ok(balance) => Ok(FeeBalance { fee, balance }),
			Err(e) => {
				warn!(target: TRACING_TARGET, error = %e, "Unable to retrieve XCM fee balance");
				Err(e.to_string())
			},
		})
	}
}
