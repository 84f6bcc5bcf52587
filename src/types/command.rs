//! Typed transition surface
//!
//! A `Command` is a fully parsed transition or query request. Parsing checks
//! argument counts and numeric fields so that managers only ever see
//! well-formed inputs. Role checks and state checks happen later, in the
//! owning manager.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::error::WorkflowError;
use super::participant::BalanceHolder;
use super::trade::TradeId;

/// Every operation the workflow accepts, with its parsed arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestTrade {
        trade_id: TradeId,
        amount: i64,
        description: String,
    },
    AcceptTrade {
        trade_id: TradeId,
    },
    RequestLc {
        trade_id: TradeId,
    },
    IssueLc {
        trade_id: TradeId,
        lc_id: String,
        expiration_date: String,
        documents: Vec<String>,
    },
    AcceptLc {
        trade_id: TradeId,
    },
    RequestLcTransfer {
        trade_id: TradeId,
        discount_rate: Decimal,
    },
    IssueLcTransfer {
        trade_id: TradeId,
    },
    AcceptLcTransfer {
        trade_id: TradeId,
    },
    RequestEl {
        trade_id: TradeId,
    },
    IssueEl {
        trade_id: TradeId,
        el_id: String,
        expiration_date: String,
    },
    PrepareShipment {
        trade_id: TradeId,
    },
    AcceptShipmentAndIssueBl {
        trade_id: TradeId,
        bl_id: String,
        expiration_date: String,
        source_port: String,
        destination_port: String,
    },
    UpdateShipmentLocation {
        trade_id: TradeId,
        location: String,
        date: String,
    },
    RequestAdvancePayment {
        trade_id: TradeId,
    },
    MakeAdvancePayment {
        trade_id: TradeId,
    },
    RequestPayment {
        trade_id: TradeId,
    },
    MakePayment {
        trade_id: TradeId,
        payment_date: String,
    },
    GetTradeStatus {
        trade_id: TradeId,
    },
    GetLcStatus {
        trade_id: TradeId,
    },
    GetElStatus {
        trade_id: TradeId,
    },
    GetShipmentLocation {
        trade_id: TradeId,
    },
    GetArrivalDate {
        trade_id: TradeId,
    },
    GetBillOfLading {
        trade_id: TradeId,
    },
    GetAccountBalance {
        trade_id: TradeId,
        entity: BalanceHolder,
    },
}

impl Command {
    /// Parse a function name and its string arguments
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` if `function` is not part of the surface
    /// - `InvalidArgument` on a wrong argument count or an unparseable
    ///   amount, discount rate or entity
    pub fn parse(function: &str, args: &[String]) -> Result<Command, WorkflowError> {
        let trade_id = || args[0].clone();

        let command = match function {
            "requestTrade" => {
                expect_args(function, args, 3, "3: {ID, Amount, Description of Goods}")?;
                Command::RequestTrade {
                    trade_id: trade_id(),
                    amount: parse_amount(&args[1])?,
                    description: args[2].clone(),
                }
            }
            "acceptTrade" => single(function, args, |trade_id| Command::AcceptTrade { trade_id })?,
            "requestLC" => single(function, args, |trade_id| Command::RequestLc { trade_id })?,
            "issueLC" => {
                if args.len() < 3 {
                    return Err(WorkflowError::argument_count(
                        function,
                        "at least 3: {Trade ID, L/C ID, Expiry Date} [List of Documents]",
                        args.len(),
                    ));
                }
                Command::IssueLc {
                    trade_id: trade_id(),
                    lc_id: args[1].clone(),
                    expiration_date: args[2].clone(),
                    documents: args[3..].to_vec(),
                }
            }
            "acceptLC" => single(function, args, |trade_id| Command::AcceptLc { trade_id })?,
            "requestLCTransfer" => {
                expect_args(function, args, 2, "2: {Trade ID, DiscountRate}")?;
                Command::RequestLcTransfer {
                    trade_id: trade_id(),
                    discount_rate: parse_discount_rate(&args[1])?,
                }
            }
            "issueLCTransfer" => {
                single(function, args, |trade_id| Command::IssueLcTransfer { trade_id })?
            }
            "acceptLCTransfer" => {
                single(function, args, |trade_id| Command::AcceptLcTransfer { trade_id })?
            }
            "requestEL" => single(function, args, |trade_id| Command::RequestEl { trade_id })?,
            "issueEL" => {
                expect_args(function, args, 3, "3: {Trade ID, E/L ID, Expiry Date}")?;
                Command::IssueEl {
                    trade_id: trade_id(),
                    el_id: args[1].clone(),
                    expiration_date: args[2].clone(),
                }
            }
            "prepareShipment" => {
                single(function, args, |trade_id| Command::PrepareShipment { trade_id })?
            }
            "acceptShipmentAndIssueBL" => {
                expect_args(
                    function,
                    args,
                    5,
                    "5: {Trade ID, B/L ID, Expiration Date, Source Port, Destination Port}",
                )?;
                Command::AcceptShipmentAndIssueBl {
                    trade_id: trade_id(),
                    bl_id: args[1].clone(),
                    expiration_date: args[2].clone(),
                    source_port: args[3].clone(),
                    destination_port: args[4].clone(),
                }
            }
            "updateShipmentLocation" => {
                expect_args(function, args, 3, "3: {Trade ID, Location, Date}")?;
                Command::UpdateShipmentLocation {
                    trade_id: trade_id(),
                    location: args[1].clone(),
                    date: args[2].clone(),
                }
            }
            "requestAdvancePayment" => {
                single(function, args, |trade_id| Command::RequestAdvancePayment { trade_id })?
            }
            "makeAdvancePayment" => {
                single(function, args, |trade_id| Command::MakeAdvancePayment { trade_id })?
            }
            "requestPayment" => {
                single(function, args, |trade_id| Command::RequestPayment { trade_id })?
            }
            "makePayment" => {
                expect_args(function, args, 2, "2: {Trade ID, Payment Date}")?;
                Command::MakePayment {
                    trade_id: trade_id(),
                    payment_date: args[1].clone(),
                }
            }
            "getTradeStatus" => {
                single(function, args, |trade_id| Command::GetTradeStatus { trade_id })?
            }
            "getLCStatus" => single(function, args, |trade_id| Command::GetLcStatus { trade_id })?,
            "getELStatus" => single(function, args, |trade_id| Command::GetElStatus { trade_id })?,
            "getShipmentLocation" => {
                single(function, args, |trade_id| Command::GetShipmentLocation { trade_id })?
            }
            "getArrivalDate" => {
                single(function, args, |trade_id| Command::GetArrivalDate { trade_id })?
            }
            "getBillOfLading" => {
                single(function, args, |trade_id| Command::GetBillOfLading { trade_id })?
            }
            "getAccountBalance" => {
                expect_args(function, args, 2, "2: {Trade ID, Entity}")?;
                Command::GetAccountBalance {
                    trade_id: trade_id(),
                    entity: BalanceHolder::from_str(&args[1])?,
                }
            }
            _ => return Err(WorkflowError::unknown_function(function)),
        };

        Ok(command)
    }

    /// Trade the command refers to
    pub fn trade_id(&self) -> &str {
        match self {
            Command::RequestTrade { trade_id, .. }
            | Command::AcceptTrade { trade_id }
            | Command::RequestLc { trade_id }
            | Command::IssueLc { trade_id, .. }
            | Command::AcceptLc { trade_id }
            | Command::RequestLcTransfer { trade_id, .. }
            | Command::IssueLcTransfer { trade_id }
            | Command::AcceptLcTransfer { trade_id }
            | Command::RequestEl { trade_id }
            | Command::IssueEl { trade_id, .. }
            | Command::PrepareShipment { trade_id }
            | Command::AcceptShipmentAndIssueBl { trade_id, .. }
            | Command::UpdateShipmentLocation { trade_id, .. }
            | Command::RequestAdvancePayment { trade_id }
            | Command::MakeAdvancePayment { trade_id }
            | Command::RequestPayment { trade_id }
            | Command::MakePayment { trade_id, .. }
            | Command::GetTradeStatus { trade_id }
            | Command::GetLcStatus { trade_id }
            | Command::GetElStatus { trade_id }
            | Command::GetShipmentLocation { trade_id }
            | Command::GetArrivalDate { trade_id }
            | Command::GetBillOfLading { trade_id }
            | Command::GetAccountBalance { trade_id, .. } => trade_id,
        }
    }

    /// Whether the command reads or writes a per-trade record
    ///
    /// `getAccountBalance` carries a trade id but only reads a bank balance.
    pub fn touches_trade(&self) -> bool {
        !matches!(self, Command::GetAccountBalance { .. })
    }

    /// Function name as it appears on the transition surface
    pub fn name(&self) -> &'static str {
        match self {
            Command::RequestTrade { .. } => "requestTrade",
            Command::AcceptTrade { .. } => "acceptTrade",
            Command::RequestLc { .. } => "requestLC",
            Command::IssueLc { .. } => "issueLC",
            Command::AcceptLc { .. } => "acceptLC",
            Command::RequestLcTransfer { .. } => "requestLCTransfer",
            Command::IssueLcTransfer { .. } => "issueLCTransfer",
            Command::AcceptLcTransfer { .. } => "acceptLCTransfer",
            Command::RequestEl { .. } => "requestEL",
            Command::IssueEl { .. } => "issueEL",
            Command::PrepareShipment { .. } => "prepareShipment",
            Command::AcceptShipmentAndIssueBl { .. } => "acceptShipmentAndIssueBL",
            Command::UpdateShipmentLocation { .. } => "updateShipmentLocation",
            Command::RequestAdvancePayment { .. } => "requestAdvancePayment",
            Command::MakeAdvancePayment { .. } => "makeAdvancePayment",
            Command::RequestPayment { .. } => "requestPayment",
            Command::MakePayment { .. } => "makePayment",
            Command::GetTradeStatus { .. } => "getTradeStatus",
            Command::GetLcStatus { .. } => "getLCStatus",
            Command::GetElStatus { .. } => "getELStatus",
            Command::GetShipmentLocation { .. } => "getShipmentLocation",
            Command::GetArrivalDate { .. } => "getArrivalDate",
            Command::GetBillOfLading { .. } => "getBillOfLading",
            Command::GetAccountBalance { .. } => "getAccountBalance",
        }
    }
}

fn expect_args(
    function: &str,
    args: &[String],
    count: usize,
    expected: &str,
) -> Result<(), WorkflowError> {
    if args.len() != count {
        return Err(WorkflowError::argument_count(function, expected, args.len()));
    }
    Ok(())
}

fn single<F>(function: &str, args: &[String], build: F) -> Result<Command, WorkflowError>
where
    F: FnOnce(TradeId) -> Command,
{
    expect_args(function, args, 1, "1: {Trade ID}")?;
    Ok(build(args[0].clone()))
}

/// Parse a trade amount, which must be a positive integer
fn parse_amount(raw: &str) -> Result<i64, WorkflowError> {
    match raw.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        Ok(amount) => Err(WorkflowError::invalid_argument(format!(
            "Amount must be a positive integer. Found {}",
            amount
        ))),
        Err(_) => Err(WorkflowError::invalid_argument(format!(
            "Amount must be an integer. Found '{}'",
            raw
        ))),
    }
}

/// Parse a discount rate, which must be a fraction in `0..=1`
fn parse_discount_rate(raw: &str) -> Result<Decimal, WorkflowError> {
    let rate = Decimal::from_str(raw.trim()).map_err(|_| {
        WorkflowError::invalid_argument(format!("Discount rate must be a number. Found '{}'", raw))
    })?;

    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(WorkflowError::invalid_argument(format!(
            "Discount rate must be between 0 and 1. Found {}",
            rate
        )));
    }

    Ok(rate)
}
