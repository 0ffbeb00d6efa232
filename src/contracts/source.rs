const VOTING_SOL: &str = include_str!("../../resources/Voting.sol");

/// Solidity source of the voting contract, embedded at build time.
pub fn contract_source() -> &'static str {
    VOTING_SOL
}
