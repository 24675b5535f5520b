// ============================================
// demos/schema.rs
// Schema generation

use cosmwasm_schema::write_api;
use peg_bridge::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};

fn main() {
    write_api! {
        instantiate: InstantiateMsg,
        execute: ExecuteMsg,
        query: QueryMsg,
    }
}
