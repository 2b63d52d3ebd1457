//! Contract interfaces of the casino.
//!
//! Every game contract exposes the same `wager(input, receiver, affiliate, betData)`
//! entry point; only the type of `input` differs (`bool` face, `uint8` cap,
//! `uint40` number mask). Games emit `PlaceBet` when the wager is accepted
//! and `Roll` once the VRF callback resolved it.

use alloy::sol;

sol! {
    /// Bet parameters shared by every game's `wager`.
    #[derive(Debug, PartialEq, Eq)]
    struct BetData {
        address token;
        uint256 betAmount;
        uint16 betCount;
        uint256 stopGain;
        uint256 stopLoss;
        uint16 maxHouseEdge;
    }

    /// Bankroll token as listed by the bank.
    #[derive(Debug, PartialEq, Eq)]
    struct BankToken {
        address tokenAddress;
        string name;
        string symbol;
        uint8 decimals;
        bool allowed;
        bool paused;
    }

    interface IBank {
        function getTokens() external view returns (BankToken[] memory tokens);

        function getBetRequirements(address token, uint256 multiplier)
            external
            view
            returns (bool isAllowedToken, uint256 maxBetAmount, uint256 maxBetCount);
    }

    interface ICasinoGame {
        function getChainlinkVRFCost(address token, uint16 betCount) external view returns (uint256);
    }

    interface ICoinToss {
        function wager(bool face, address receiver, address affiliate, BetData betData) external payable;

        #[derive(Debug, PartialEq, Eq)]
        event PlaceBet(
            uint256 id,
            address indexed receiver,
            address indexed token,
            uint256 amount,
            uint256 chainlinkVRFCost,
            bool face,
            uint16 betCount,
            uint256 stopGain,
            uint256 stopLoss
        );

        #[derive(Debug, PartialEq, Eq)]
        event Roll(
            uint256 indexed id,
            address indexed receiver,
            address indexed token,
            uint256 totalBetAmount,
            bool face,
            bool[] rolled,
            uint256 payout
        );
    }

    interface IDice {
        function wager(uint8 cap, address receiver, address affiliate, BetData betData) external payable;

        #[derive(Debug, PartialEq, Eq)]
        event PlaceBet(
            uint256 id,
            address indexed receiver,
            address indexed token,
            uint256 amount,
            uint256 chainlinkVRFCost,
            uint8 cap,
            uint16 betCount,
            uint256 stopGain,
            uint256 stopLoss
        );

        #[derive(Debug, PartialEq, Eq)]
        event Roll(
            uint256 indexed id,
            address indexed receiver,
            address indexed token,
            uint256 totalBetAmount,
            uint8 cap,
            uint8[] rolled,
            uint256 payout
        );
    }

    interface IRoulette {
        function wager(uint40 numbers, address receiver, address affiliate, BetData betData) external payable;

        #[derive(Debug, PartialEq, Eq)]
        event PlaceBet(
            uint256 id,
            address indexed receiver,
            address indexed token,
            uint256 amount,
            uint256 chainlinkVRFCost,
            uint40 numbers,
            uint16 betCount,
            uint256 stopGain,
            uint256 stopLoss
        );

        #[derive(Debug, PartialEq, Eq)]
        event Roll(
            uint256 indexed id,
            address indexed receiver,
            address indexed token,
            uint256 totalBetAmount,
            uint40 numbers,
            uint8[] rolled,
            uint256 payout
        );
    }

    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}
