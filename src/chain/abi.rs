use alloy_sol_types::sol;

sol! {
    interface ISetToken {
        function getComponents() external view returns (address[] memory);
        function getUnits() external view returns (uint256[] memory);
        function naturalUnit() external view returns (uint256);
    }

    interface IRebalancingSetToken {
        function currentSet() external view returns (address);
        function nextSet() external view returns (address);
        function auctionLibrary() external view returns (address);
        // [auctionStartTime, auctionTimeToPivot, auctionStartPrice, auctionPivotPrice]
        function getAuctionPriceParameters() external view returns (uint256[] memory);
    }

    interface IAuctionPriceCurve {
        function priceDivisor() external view returns (uint256);
    }

    interface ICToken {
        function exchangeRateStored() external view returns (uint256);
        function underlying() external view returns (address);
    }

    interface IRebalancingSetBidder {
        function bidAndWithdraw(
            address rebalancingSetToken,
            uint256 quantity,
            bool allowPartialFill
        ) external;
        function bidAndWithdrawWithEther(
            address rebalancingSetToken,
            uint256 quantity,
            bool allowPartialFill
        ) external payable;
    }
}
