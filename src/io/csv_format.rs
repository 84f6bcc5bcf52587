//! CSV format handling for transition scripts and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - ScriptRecord structure for deserialization
//! - Conversion from script rows to replayable steps
//! - Balance and trade report serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::core::TradeSummary;
use crate::types::{BalanceHolder, Caller, Command};
use serde::Deserialize;
use std::fmt::Display;
use std::io::Write;

/// Function name that bootstraps the workflow instead of invoking it
pub const INIT_FUNCTION: &str = "init";

/// Separator between the arguments packed in the `args` column
pub const ARG_SEPARATOR: char = '|';

/// CSV record structure for deserialization
///
/// Matches the script format with columns: org, issuer, function, args.
/// The args column is optional because several functions take only a
/// trade id and `init` may be called with no arguments at all.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScriptRecord {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub issuer: String,
    pub function: String,
    #[serde(default)]
    pub args: Option<String>,
}

/// One replayable row of a transition script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Bootstrap identities and balances; the caller columns are ignored
    Init(Vec<String>),
    /// A parsed transition or query submitted by `caller`
    Invoke { caller: Caller, command: Command },
}

/// Split the packed `args` column into individual arguments
pub fn split_args(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        Some(packed) if !packed.is_empty() => packed
            .split(ARG_SEPARATOR)
            .map(|arg| arg.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Convert a ScriptRecord to a ScriptStep
///
/// `init` rows become bootstrap steps. Every other row is parsed into a
/// typed `Command`, so argument counts and numeric fields are checked here
/// rather than at replay time.
///
/// # Returns
///
/// * `Ok(ScriptStep)` - Successfully converted row
/// * `Err(String)` - Missing function, missing caller or a parse failure
pub fn convert_script_record(record: ScriptRecord) -> Result<ScriptStep, String> {
    let function = record.function.trim();
    if function.is_empty() {
        return Err("Missing function name".to_string());
    }

    let args = split_args(record.args.as_deref());
    if function == INIT_FUNCTION {
        return Ok(ScriptStep::Init(args));
    }

    if record.org.trim().is_empty() || record.issuer.trim().is_empty() {
        return Err(format!("Function '{}' needs both org and issuer", function));
    }

    let command = Command::parse(function, &args).map_err(|e| e.to_string())?;
    Ok(ScriptStep::Invoke {
        caller: Caller::new(record.org.trim(), record.issuer.trim()),
        command,
    })
}

/// Write the bank balances report
///
/// Columns: entity, balance. A holder that was never bootstrapped gets an
/// empty balance column.
pub fn write_balances_csv(
    balances: &[(BalanceHolder, Option<i64>)],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["entity", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (holder, balance) in balances {
        writer
            .write_record(&[holder.to_string(), optional(balance.as_ref())])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write one row per trade, in the order given
///
/// Columns: trade, trade_status, paid_to_date, lc_status, lc_amount,
/// lc_beneficiary, el_status, location. Records a trade does not have yet
/// are left empty.
pub fn write_trades_csv(trades: &[TradeSummary], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "trade",
            "trade_status",
            "paid_to_date",
            "lc_status",
            "lc_amount",
            "lc_beneficiary",
            "el_status",
            "location",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for trade in trades {
        writer
            .write_record(&[
                trade.trade_id.clone(),
                optional(trade.trade_status.as_ref()),
                optional(trade.paid_to_date.as_ref()),
                optional(trade.lc_status.as_ref()),
                optional(trade.lc_amount.as_ref()),
                trade.lc_beneficiary.clone().unwrap_or_default(),
                optional(trade.el_status.as_ref()),
                optional(trade.location.as_ref()),
            ])
            .map_err(|e| format!("Failed to write trade record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

fn optional<T: Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LcStatus, ShipmentLocation, TradeStatus};
    use rstest::rstest;

    fn record(org: &str, issuer: &str, function: &str, args: Option<&str>) -> ScriptRecord {
        ScriptRecord {
            org: org.to_string(),
            issuer: issuer.to_string(),
            function: function.to_string(),
            args: args.map(|s| s.to_string()),
        }
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(""), 0)]
    #[case(Some("   "), 0)]
    #[case(Some("T1"), 1)]
    #[case(Some("T1|50000|Wood for Toys"), 3)]
    #[case(Some(" T1 | DESTINATION | 02/01/2019 "), 3)]
    fn test_split_args(#[case] raw: Option<&str>, #[case] expected_len: usize) {
        let args = split_args(raw);
        assert_eq!(args.len(), expected_len);
        assert!(args.iter().all(|arg| arg.trim() == arg));
    }

    #[test]
    fn test_convert_init_ignores_caller() {
        let step = convert_script_record(record("", "", "init", Some("a|b|1"))).unwrap();
        assert_eq!(
            step,
            ScriptStep::Init(vec!["a".to_string(), "b".to_string(), "1".to_string()])
        );

        let empty = convert_script_record(record("", "", "init", None)).unwrap();
        assert_eq!(empty, ScriptStep::Init(Vec::new()));
    }

    #[test]
    fn test_convert_invoke_parses_command() {
        let step = convert_script_record(record(
            "ImporterOrgMSP",
            "ca.importerorg.trade.com",
            "requestTrade",
            Some("T1|50000|Wood for Toys"),
        ))
        .unwrap();

        match step {
            ScriptStep::Invoke { caller, command } => {
                assert_eq!(caller.org, "ImporterOrgMSP");
                assert_eq!(caller.cert_issuer, "ca.importerorg.trade.com");
                assert_eq!(
                    command,
                    Command::RequestTrade {
                        trade_id: "T1".to_string(),
                        amount: 50000,
                        description: "Wood for Toys".to_string(),
                    }
                );
            }
            other => panic!("expected an invocation, got {:?}", other),
        }
    }

    #[rstest]
    #[case::missing_function(record("Org", "ca", "  ", Some("T1")), "Missing function")]
    #[case::missing_org(record("", "ca", "acceptTrade", Some("T1")), "org and issuer")]
    #[case::unknown_function(record("Org", "ca", "shipIt", Some("T1")), "shipIt")]
    #[case::bad_amount(record("Org", "ca", "requestTrade", Some("T1|lots|Wood")), "integer")]
    #[case::wrong_count(record("Org", "ca", "acceptTrade", None), "Incorrect number of arguments")]
    fn test_convert_rejects(#[case] input: ScriptRecord, #[case] fragment: &str) {
        let err = convert_script_record(input).unwrap_err();
        assert!(err.contains(fragment), "unexpected error: {}", err);
    }

    #[test]
    fn test_write_balances_csv() {
        let balances = vec![
            (BalanceHolder::Exporter, Some(147500)),
            (BalanceHolder::Importer, Some(150000)),
            (BalanceHolder::Lender, None),
        ];
        let mut output = Vec::new();

        write_balances_csv(&balances, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "entity,balance\nexporter,147500\nimporter,150000\nlender,\n"
        );
    }

    #[test]
    fn test_write_trades_csv() {
        let trades = vec![
            TradeSummary {
                trade_id: "T1".to_string(),
                trade_status: Some(TradeStatus::Accepted),
                paid_to_date: Some(25000),
                lc_status: Some(LcStatus::Accepted),
                lc_amount: Some(25000),
                lc_beneficiary: Some("LumberInc".to_string()),
                el_status: None,
                location: Some(ShipmentLocation::Elsewhere("AT_SEA".to_string())),
            },
            TradeSummary {
                trade_id: "T2".to_string(),
                trade_status: None,
                paid_to_date: None,
                lc_status: None,
                lc_amount: None,
                lc_beneficiary: None,
                el_status: None,
                location: None,
            },
        ];
        let mut output = Vec::new();

        write_trades_csv(&trades, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "trade,trade_status,paid_to_date,lc_status,lc_amount,lc_beneficiary,el_status,location"
        );
        assert_eq!(lines[1], "T1,ACCEPTED,25000,ACCEPTED,25000,LumberInc,,AT_SEA");
        assert_eq!(lines[2], "T2,,,,,,,");
    }
}
