//! Solidity source and ERC-20 artifacts for meme coins and tokens.
//!
//! Nothing here is compiled. The bytecode is a fixed placeholder and the ABI
//! is the standard ERC-20 surface, which is all the simulated deployer needs.

use crate::domain::model::{MemeCoin, Token, TokenFeatures};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

/// Placeholder init code (constructor preamble only).
pub const PLACEHOLDER_BYTECODE: &str = "0x608060405234801561001057600080fd5b50";

const SPDX_PRAGMA: &str = "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.0;\n";
const IMPORT_ERC20: &str = "import \"@openzeppelin/contracts/token/ERC20/ERC20.sol\";";
const IMPORT_OWNABLE: &str = "import \"@openzeppelin/contracts/access/Ownable.sol\";";
const IMPORT_BURNABLE: &str =
    "import \"@openzeppelin/contracts/token/ERC20/extensions/ERC20Burnable.sol\";";
const IMPORT_PAUSABLE: &str = "import \"@openzeppelin/contracts/security/Pausable.sol\";";

const MINT_FN: &str = "    function mint(address to, uint256 amount) public onlyOwner {\n        _mint(to, amount);\n    }\n";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedContract {
    pub contract_code: String,
    pub abi: JsonValue,
    pub bytecode: String,
    pub constructor_args: JsonValue,
}

/// A valid Solidity identifier from `name`, else from `fallback`.
/// A leading digit gets an underscore prefix.
fn contract_identifier(name: &str, fallback: &str) -> String {
    let clean = |raw: &str| -> String {
        raw.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    };
    let mut ident = clean(name);
    if ident.is_empty() {
        ident = clean(fallback);
    }
    if ident.is_empty() {
        ident = "MemeCoin".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Escapes a value embedded inside a Solidity string literal.
fn solidity_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub fn generate_meme_coin_contract(coin: &MemeCoin) -> GeneratedContract {
    let name = contract_identifier(&coin.name, &coin.symbol);
    let mut code = String::new();
    code.push_str(SPDX_PRAGMA);
    code.push('\n');
    code.push_str(IMPORT_ERC20);
    code.push('\n');
    code.push_str(IMPORT_OWNABLE);
    code.push_str("\n\n");
    code.push_str(&format!("contract {} is ERC20, Ownable {{\n", name));
    code.push_str(&format!(
        "    constructor() ERC20(\"{}\", \"{}\") {{\n        _mint(msg.sender, {} * 10**{});\n    }}\n\n",
        solidity_string(&coin.name),
        solidity_string(&coin.symbol),
        coin.total_supply,
        coin.decimals
    ));
    code.push_str(MINT_FN);
    code.push_str("}\n");

    GeneratedContract {
        contract_code: code,
        abi: erc20_abi(true, false, false),
        bytecode: PLACEHOLDER_BYTECODE.to_string(),
        constructor_args: json!([coin.name, coin.symbol, coin.total_supply, coin.decimals]),
    }
}

pub fn generate_token_contract(token: &Token, features: &TokenFeatures) -> GeneratedContract {
    let name = contract_identifier(&format!("{}Token", token.symbol.to_ascii_uppercase()), "Token");

    let mut imports = vec![IMPORT_ERC20, IMPORT_OWNABLE];
    let mut bases = vec!["ERC20"];
    if features.is_burnable {
        imports.push(IMPORT_BURNABLE);
        bases.push("ERC20Burnable");
    }
    if features.is_pausable {
        imports.push(IMPORT_PAUSABLE);
        bases.push("Pausable");
    }
    bases.push("Ownable");

    let mut code = String::new();
    code.push_str(SPDX_PRAGMA);
    code.push('\n');
    for import in &imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push('\n');
    code.push_str(&format!("contract {} is {} {{\n", name, bases.join(", ")));
    code.push_str(&format!(
        "    constructor() ERC20(\"{}\", \"{}\") {{\n        _mint(msg.sender, {} * 10**decimals());\n    }}\n",
        solidity_string(&token.name),
        solidity_string(&token.symbol),
        token.total_supply
    ));
    if token.decimals != 18 {
        code.push_str(&format!(
            "\n    function decimals() public pure override returns (uint8) {{\n        return {};\n    }}\n",
            token.decimals
        ));
    }
    if features.is_mintable {
        code.push('\n');
        code.push_str(MINT_FN);
    }
    if features.is_pausable {
        code.push_str(
            "\n    function pause() public onlyOwner {\n        _pause();\n    }\n\n    function unpause() public onlyOwner {\n        _unpause();\n    }\n",
        );
    }
    code.push_str("}\n");

    GeneratedContract {
        contract_code: code,
        abi: erc20_abi(features.is_mintable, features.is_burnable, features.is_pausable),
        bytecode: PLACEHOLDER_BYTECODE.to_string(),
        constructor_args: json!([token.name, token.symbol, token.total_supply, token.decimals]),
    }
}

fn view_fn(name: &str, inputs: JsonValue, output: &str) -> JsonValue {
    json!({
        "type": "function",
        "name": name,
        "inputs": inputs,
        "outputs": [{ "name": "", "type": output }],
        "stateMutability": "view"
    })
}

fn mutating_fn(name: &str, inputs: JsonValue, returns_bool: bool) -> JsonValue {
    let outputs = if returns_bool {
        json!([{ "name": "", "type": "bool" }])
    } else {
        json!([])
    };
    json!({
        "type": "function",
        "name": name,
        "inputs": inputs,
        "outputs": outputs,
        "stateMutability": "nonpayable"
    })
}

/// Standard ERC-20 ABI plus entries for the selected extensions.
pub fn erc20_abi(mintable: bool, burnable: bool, pausable: bool) -> JsonValue {
    let address = |name: &str| json!({ "name": name, "type": "address" });
    let amount = |name: &str| json!({ "name": name, "type": "uint256" });

    let mut entries = vec![
        json!({ "type": "constructor", "inputs": [], "stateMutability": "nonpayable" }),
        view_fn("name", json!([]), "string"),
        view_fn("symbol", json!([]), "string"),
        view_fn("decimals", json!([]), "uint8"),
        view_fn("totalSupply", json!([]), "uint256"),
        view_fn("balanceOf", json!([address("account")]), "uint256"),
        view_fn(
            "allowance",
            json!([address("owner"), address("spender")]),
            "uint256",
        ),
        mutating_fn("transfer", json!([address("to"), amount("amount")]), true),
        mutating_fn("approve", json!([address("spender"), amount("amount")]), true),
        mutating_fn(
            "transferFrom",
            json!([address("from"), address("to"), amount("amount")]),
            true,
        ),
        json!({
            "type": "event",
            "name": "Transfer",
            "anonymous": false,
            "inputs": [
                { "name": "from", "type": "address", "indexed": true },
                { "name": "to", "type": "address", "indexed": true },
                { "name": "value", "type": "uint256", "indexed": false }
            ]
        }),
        json!({
            "type": "event",
            "name": "Approval",
            "anonymous": false,
            "inputs": [
                { "name": "owner", "type": "address", "indexed": true },
                { "name": "spender", "type": "address", "indexed": true },
                { "name": "value", "type": "uint256", "indexed": false }
            ]
        }),
    ];
    if mintable {
        entries.push(mutating_fn("mint", json!([address("to"), amount("amount")]), false));
    }
    if burnable {
        entries.push(mutating_fn("burn", json!([amount("amount")]), false));
        entries.push(mutating_fn(
            "burnFrom",
            json!([address("account"), amount("amount")]),
            false,
        ));
    }
    if pausable {
        entries.push(mutating_fn("pause", json!([]), false));
        entries.push(mutating_fn("unpause", json!([]), false));
        entries.push(view_fn("paused", json!([]), "bool"));
    }
    JsonValue::Array(entries)
}
