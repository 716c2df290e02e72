use super::catalog::Catalog;
use super::clause::{Clause, Record};
use super::error::FilterError;

/// Evaluates one clause tree against one record.
///
/// AND stops at the first false child, OR at the first true one; an empty
/// AND is true and an empty OR is false. Neither the clause nor the record
/// is touched, so one tree can be reused across a whole record set.
pub fn evaluate(catalog: &Catalog, clause: &Clause, record: &Record) -> Result<bool, FilterError> {
    match clause {
        Clause::Filter(filter) => {
            let func = catalog.lookup(filter.category, filter.func_name)?;
            func(record, &filter.key, &filter.parameter)
        }
        Clause::And(children) => {
            for child in children {
                if !evaluate(catalog, child, record)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Clause::Or(children) => {
            for child in children {
                if evaluate(catalog, child, record)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Keeps the records the clause matches, in input order. A single linear
/// scan; the first operator error aborts the whole call.
pub fn apply<'a>(
    catalog: &Catalog,
    clause: &Clause,
    records: &'a [Record],
) -> Result<Vec<&'a Record>, FilterError> {
    let mut matched = Vec::new();
    for record in records {
        if evaluate(catalog, clause, record)? {
            matched.push(record);
        }
    }
    Ok(matched)
}
