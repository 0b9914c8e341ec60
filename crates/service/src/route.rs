//! Route decider

use polar_types::{Environment, Location, Pathway, RoutingError};

/// Pick the pathway between two locations
///
/// The first matching rule wins:
/// 1. Ethereum to the Asset Hub
/// 2. Asset Hub to Ethereum
/// 3. Asset Hub to any other substrate location
/// 4. Any other substrate location to the Asset Hub
pub fn decide(
	source: &Location,
	destination: &Location,
	environment: &Environment,
) -> Result<Pathway, RoutingError> {
	let source_is_hub = environment.is_asset_hub(source);
	let destination_is_hub = environment.is_asset_hub(destination);

	if source.is_ethereum() && destination_is_hub {
		Ok(Pathway::EthereumToAssetHub)
	} else if source_is_hub && destination.is_ethereum() {
		Ok(Pathway::AssetHubToEthereum)
	} else if source_is_hub && destination.is_substrate() && !destination_is_hub {
		Ok(Pathway::AssetHubToParachain)
	} else if source.is_substrate() && !source_is_hub && destination_is_hub {
		Ok(Pathway::ParachainToAssetHub)
	} else {
		Err(RoutingError::UnsupportedPair {
			source_id: source.id.clone(),
			destination_id: destination.id.clone(),
		})
	}
}
