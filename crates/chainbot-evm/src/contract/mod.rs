use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use tracing::instrument;

use crate::{ChainReader, Error};

sol! {
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

/// Calls a view function of `contract` and decodes its output
pub async fn call_view<C: SolCall>(reader: &dyn ChainReader, contract: Address, call: C) -> Result<C::Return, Error> {
    let output = reader.call(contract, call.abi_encode().into()).await?;
    if output.is_empty() {
        return Err(Error::Decoding(format!("{} returned no data", C::SIGNATURE)));
    }

    C::abi_decode_returns(&output).map_err(|e| Error::Decoding(format!("{}: {}", C::SIGNATURE, e)))
}

/// Reads the ERC-20 metadata of `token`. The four reads are issued concurrently.
#[instrument(name = "fetch_token_metadata", skip(reader))]
pub async fn fetch_token_metadata(reader: &dyn ChainReader, token: Address) -> Result<TokenMetadata, Error> {
    let (name, symbol, decimals, total_supply) = tokio::try_join!(
        call_view(reader, token, IERC20::nameCall {}),
        call_view(reader, token, IERC20::symbolCall {}),
        call_view(reader, token, IERC20::decimalsCall {}),
        call_view(reader, token, IERC20::totalSupplyCall {}),
    )?;

    Ok(TokenMetadata {
        name,
        symbol,
        decimals,
        total_supply,
    })
}
