use crate::coerce::number_text;
use crate::error::{EtlError, Result};
use crate::schema::{
    has_column, ALLOWED_PRODUCTS, ALLOWED_RECORD_TYPES, ALLOWED_STAGES, JOIN_KEY,
    LOSS_WON_OPPORTUNITY, OPPORTUNITY_ID, PAYMENT_COLUMNS, PRODUCT_TYPE, RECORD_TYPE, STAGE,
};
use polars::prelude::*;

pub struct Joiner;

impl Joiner {
    /// Left-joins cleaned opportunities with the cleaned loss/won table and keeps
    /// only sales-process rows that settled as won or lost for API/IPG products.
    ///
    /// Every opportunity column is carried over unchanged together with the
    /// payment columns present in the loss/won table. Keys are compared through
    /// [`join_keys`], so a numeric ID matches the same ID stored as text. When
    /// several loss/won rows share an opportunity the first one wins, so each
    /// output row is exactly one opportunity. Blank keys never match.
    ///
    /// # Errors
    /// Returns [`EtlError::SchemaMismatch`] if a join or filter column is missing.
    pub fn join_and_filter(opportunities: &DataFrame, loss_won: &DataFrame) -> Result<DataFrame> {
        require_columns(
            opportunities,
            "opportunity",
            &[OPPORTUNITY_ID, RECORD_TYPE, STAGE, PRODUCT_TYPE],
        )?;
        require_columns(loss_won, "loss_won", &[LOSS_WON_OPPORTUNITY])?;

        let payment_columns: Vec<&str> = PAYMENT_COLUMNS
            .iter()
            .copied()
            .filter(|name| has_column(loss_won, name) && !has_column(opportunities, name))
            .collect();

        let mut keyed_loss_won = loss_won.clone();
        keyed_loss_won.with_column(join_keys(loss_won.column(LOSS_WON_OPPORTUNITY)?)?)?;

        let mut projection = vec![col(JOIN_KEY)];
        projection.extend(payment_columns.iter().map(|name| col(*name)));

        let payments = keyed_loss_won
            .lazy()
            .select(projection)
            .filter(col(JOIN_KEY).is_not_null())
            .group_by_stable([col(JOIN_KEY)])
            .agg(
                payment_columns
                    .iter()
                    .map(|name| col(*name).first())
                    .collect::<Vec<_>>(),
            );

        let mut keyed_opportunities = opportunities.clone();
        keyed_opportunities.with_column(join_keys(opportunities.column(OPPORTUNITY_ID)?)?)?;

        let joined = keyed_opportunities
            .lazy()
            .join(
                payments,
                [col(JOIN_KEY)],
                [col(JOIN_KEY)],
                JoinArgs::new(JoinType::Left),
            )
            .filter(
                one_of(RECORD_TYPE, &ALLOWED_RECORD_TYPES)
                    .and(one_of(STAGE, &ALLOWED_STAGES))
                    .and(one_of(PRODUCT_TYPE, &ALLOWED_PRODUCTS)),
            )
            .collect()?
            .drop(JOIN_KEY)?;

        tracing::info!(
            opportunities = opportunities.height(),
            loss_won = loss_won.height(),
            selected = joined.height(),
            "Join and filter complete"
        );

        Ok(joined)
    }
}

fn require_columns(frame: &DataFrame, table: &str, names: &[&str]) -> Result<()> {
    match names.iter().find(|name| !has_column(frame, name)) {
        Some(missing) => Err(EtlError::schema_mismatch(table, *missing)),
        None => Ok(()),
    }
}

/// Normalized text form of an ID column, named [`JOIN_KEY`].
///
/// Text is trimmed; numbers print without an integral fraction. Nulls, blank
/// text and non-finite numbers become null so they never match.
///
/// # Errors
/// Returns an error if the column cannot be cast.
pub fn join_keys(series: &Series) -> PolarsResult<Series> {
    let keys: StringChunked = match series.dtype() {
        dtype if dtype.is_numeric() => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()).map(number_text))
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|value| {
                value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
            .collect(),
    };
    Ok(keys.with_name(JOIN_KEY.into()).into_series())
}

/// `column IN (values)` on already upper-cased text.
fn one_of(column: &str, values: &[&str]) -> Expr {
    values
        .iter()
        .map(|value| col(column).eq(lit(*value)))
        .reduce(Expr::or)
        .unwrap_or_else(|| lit(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::Cleaner;
    use crate::schema::{ADVANCE_RECEIVED, ADVANCE_RECEIVED_DATE, ORDER_VALUE};
    use polars::df;

    fn opportunities() -> DataFrame {
        df!(
            OPPORTUNITY_ID => ["OPP-1", "OPP-2", "OPP-3", "OPP-4", "OPP-5", "OPP-6"],
            RECORD_TYPE => [
                "SALES PROCESS",
                "SALES CLOSED/LOST/DROPPED",
                "SALES PROCESS",
                "PARTNER",
                "SALES PROCESS",
                "SALES PROCESS"
            ],
            STAGE => ["ORDER WON", "ORDER LOST", "NEGOTIATION", "ORDER WON", "ORDER WON", "ORDER LOST"],
            PRODUCT_TYPE => ["API", "IPG", "API", "API", "POS", "IPG"],
            ORDER_VALUE => [100.0, 50.0, 70.0, 10.0, 5.0, 30.0]
        )
        .unwrap()
    }

    fn loss_won() -> DataFrame {
        df!(
            LOSS_WON_OPPORTUNITY => ["OPP-1", "OPP-1", "OPP-2", "", "OPP-9"],
            ADVANCE_RECEIVED => [40.0, 99.0, 10.0, 1.0, 7.0],
            ADVANCE_RECEIVED_DATE => ["2024-01-05", "2024-02-01", "2024-03-10", "2024-04-01", "2024-05-01"],
            "Remarks" => ["a", "b", "c", "d", "e"]
        )
        .unwrap()
    }

    #[test]
    fn test_filter_keeps_allowed_rows_only() {
        let joined = Joiner::join_and_filter(&opportunities(), &loss_won()).unwrap();
        let ids: Vec<Option<&str>> = joined
            .column(OPPORTUNITY_ID)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some("OPP-1"), Some("OPP-2"), Some("OPP-6")]);
    }

    #[test]
    fn test_payment_columns_carried_and_null_without_match() {
        let joined = Joiner::join_and_filter(&opportunities(), &loss_won()).unwrap();

        let advance = joined.column(ADVANCE_RECEIVED).unwrap().f64().unwrap();
        assert_eq!(advance.get(0), Some(40.0));
        assert_eq!(advance.get(1), Some(10.0));
        assert_eq!(advance.get(2), None);

        assert!(joined.column(ADVANCE_RECEIVED_DATE).is_ok());
        assert!(joined.column("Remarks").is_err());
    }

    #[test]
    fn test_duplicate_loss_won_rows_do_not_duplicate_opportunities() {
        let joined = Joiner::join_and_filter(&opportunities(), &loss_won()).unwrap();
        assert_eq!(joined.height(), 3);
    }

    #[test]
    fn test_all_opportunity_columns_carried() {
        let joined = Joiner::join_and_filter(&opportunities(), &loss_won()).unwrap();
        for name in [OPPORTUNITY_ID, RECORD_TYPE, STAGE, PRODUCT_TYPE, ORDER_VALUE] {
            assert!(joined.column(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_missing_filter_column_is_schema_mismatch() {
        let opportunities = opportunities().drop(STAGE).unwrap();
        let err = Joiner::join_and_filter(&opportunities, &loss_won()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::SchemaMismatch { ref column, .. } if column == STAGE
        ));
    }

    #[test]
    fn test_missing_foreign_key_is_schema_mismatch() {
        let loss_won = loss_won().drop(LOSS_WON_OPPORTUNITY).unwrap();
        let err = Joiner::join_and_filter(&opportunities(), &loss_won).unwrap_err();
        assert!(matches!(err, EtlError::SchemaMismatch { ref table, .. } if table == "loss_won"));
    }

    #[test]
    fn test_loss_won_without_payment_columns() {
        let loss_won = df!(LOSS_WON_OPPORTUNITY => ["OPP-1"]).unwrap();
        let joined = Joiner::join_and_filter(&opportunities(), &loss_won).unwrap();
        assert_eq!(joined.height(), 3);
        assert!(joined.column(ADVANCE_RECEIVED).is_err());
    }

    #[test]
    fn test_numeric_keys_match_text_keys() {
        let opportunities = df!(
            OPPORTUNITY_ID => [1.0, 2.0],
            RECORD_TYPE => ["SALES PROCESS", "SALES PROCESS"],
            STAGE => ["ORDER WON", "ORDER LOST"],
            PRODUCT_TYPE => ["API", "API"]
        )
        .unwrap();
        let loss_won = df!(
            LOSS_WON_OPPORTUNITY => [2.0],
            ADVANCE_RECEIVED => [12.5]
        )
        .unwrap();

        let joined = Joiner::join_and_filter(&opportunities, &loss_won).unwrap();
        let advance = joined.column(ADVANCE_RECEIVED).unwrap().f64().unwrap();
        assert_eq!(advance.get(0), None);
        assert_eq!(advance.get(1), Some(12.5));
    }

    #[test]
    fn test_numeric_ids_match_text_foreign_keys() {
        let opportunities = df!(
            OPPORTUNITY_ID => [1001.0, 1002.0],
            RECORD_TYPE => ["SALES PROCESS", "SALES PROCESS"],
            STAGE => ["ORDER WON", "ORDER LOST"],
            PRODUCT_TYPE => ["API", "IPG"]
        )
        .unwrap();
        let loss_won = df!(
            LOSS_WON_OPPORTUNITY => ["1001", " 1002 "],
            ADVANCE_RECEIVED => [10.0, 20.0]
        )
        .unwrap();

        let joined = Joiner::join_and_filter(&opportunities, &loss_won).unwrap();
        let advance = joined.column(ADVANCE_RECEIVED).unwrap().f64().unwrap();
        assert_eq!(advance.get(0), Some(10.0));
        assert_eq!(advance.get(1), Some(20.0));

        let ids = joined.column(OPPORTUNITY_ID).unwrap();
        assert_eq!(ids.dtype(), &DataType::Float64);
        assert_eq!(ids.f64().unwrap().get(0), Some(1001.0));
        assert!(joined.column(JOIN_KEY).is_err());
    }

    #[test]
    fn test_blank_numeric_keys_never_match() {
        let opportunities = df!(
            OPPORTUNITY_ID => [Some(1001.0), None],
            RECORD_TYPE => ["SALES PROCESS", "SALES PROCESS"],
            STAGE => ["ORDER WON", "ORDER LOST"],
            PRODUCT_TYPE => ["API", "API"]
        )
        .unwrap();
        let loss_won = df!(
            LOSS_WON_OPPORTUNITY => [None, Some(1001.0)],
            ADVANCE_RECEIVED => [99.0, 5.0]
        )
        .unwrap();

        let opportunities = Cleaner::clean_opportunities(&opportunities).unwrap();
        let loss_won = Cleaner::clean(&loss_won).unwrap();
        let joined = Joiner::join_and_filter(&opportunities, &loss_won).unwrap();

        let advance = joined.column(ADVANCE_RECEIVED).unwrap().f64().unwrap();
        assert_eq!(advance.get(0), Some(5.0));
        assert_eq!(advance.get(1), None);
    }

    #[test]
    fn test_join_keys_normalization() {
        let numeric = Series::new("id".into(), [Some(1001.0), None, Some(f64::NAN), Some(2.5)]);
        let keys: Vec<Option<String>> = join_keys(&numeric)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        assert_eq!(
            keys,
            vec![Some("1001".to_string()), None, None, Some("2.5".to_string())]
        );

        let text = Series::new("id".into(), [Some(" OPP-1 "), Some(""), None]);
        let keys = join_keys(&text).unwrap();
        assert_eq!(keys.name().as_str(), JOIN_KEY);
        assert_eq!(keys.str().unwrap().get(0), Some("OPP-1"));
        assert_eq!(keys.null_count(), 2);
    }
}
