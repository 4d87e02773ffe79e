use holidays_common::{error::Error, frame::HolidayFrame, holiday::TableRef};
use sea_orm::sea_query::{
    Alias, ColumnDef, Expr, Func, InsertStatement, Order, Query, SelectStatement, SimpleExpr,
    Table, TableAlterStatement, TableCreateStatement,
};

use crate::mapping::{cell_to_value, parse_bool, query_error_to_domain};

/// Postgres caps bind parameters per statement at u16::MAX.
const MAX_BIND_PARAMS: usize = 65_535;

/// SQL type of a target column, as far as converting staged text goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Boolean,
    BigInt,
    Double,
    Text,
    /// Any other type of an existing column, named by its `udt_name`.
    /// Cells are sent as text and cast on the server.
    Other(String),
}

impl ColumnKind {
    fn of_cell(cell: &str) -> Self {
        let numeric = cell.bytes().any(|b| b.is_ascii_digit());

        if parse_bool(cell).is_some() {
            ColumnKind::Boolean
        } else if numeric && cell.parse::<i64>().is_ok() {
            ColumnKind::BigInt
        } else if numeric && cell.parse::<f64>().is_ok() {
            ColumnKind::Double
        } else {
            ColumnKind::Text
        }
    }

    fn widen(self, other: ColumnKind) -> ColumnKind {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnKind::BigInt, ColumnKind::Double) | (ColumnKind::Double, ColumnKind::BigInt) => {
                ColumnKind::Double
            }
            _ => ColumnKind::Text,
        }
    }

    /// Kind of an existing column from `information_schema.columns.udt_name`.
    pub(crate) fn from_udt_name(udt_name: &str) -> Self {
        match udt_name {
            "bool" => ColumnKind::Boolean,
            "int2" | "int4" | "int8" => ColumnKind::BigInt,
            "float4" | "float8" | "numeric" => ColumnKind::Double,
            "text" | "varchar" | "bpchar" => ColumnKind::Text,
            other => ColumnKind::Other(other.to_string()),
        }
    }
}

fn infer_column_kind(frame: &HolidayFrame, column_idx: usize) -> ColumnKind {
    frame
        .column_values(column_idx)
        .filter(|cell| !cell.is_empty())
        .map(ColumnKind::of_cell)
        .reduce(ColumnKind::widen)
        .unwrap_or(ColumnKind::Text)
}

/// Infers one [ColumnKind] per column from its non-empty cells.
/// Columns without any value fall back to text.
pub(crate) fn infer_column_kinds(frame: &HolidayFrame) -> Vec<ColumnKind> {
    (0..frame.columns().len())
        .map(|idx| infer_column_kind(frame, idx))
        .collect()
}

/// Kinds to convert the frame's cells with when appending to an existing
/// table, plus the frame columns the table does not have yet (with kinds
/// inferred from the frame).
pub(crate) fn resolve_column_kinds(
    frame: &HolidayFrame,
    existing: &[(String, ColumnKind)],
) -> (Vec<ColumnKind>, Vec<(String, ColumnKind)>) {
    let mut kinds = Vec::with_capacity(frame.columns().len());
    let mut missing = Vec::new();

    for (idx, column) in frame.columns().iter().enumerate() {
        match existing.iter().find(|(name, _)| name == column) {
            Some((_, kind)) => kinds.push(kind.clone()),
            None => {
                let kind = infer_column_kind(frame, idx);
                missing.push((column.clone(), kind.clone()));
                kinds.push(kind);
            }
        }
    }

    (kinds, missing)
}

fn column_def(column: &str, kind: &ColumnKind) -> ColumnDef {
    let mut def = ColumnDef::new(Alias::new(column));
    match kind {
        ColumnKind::Boolean => def.boolean(),
        ColumnKind::BigInt => def.big_integer(),
        ColumnKind::Double => def.double(),
        ColumnKind::Text | ColumnKind::Other(_) => def.text(),
    };
    def
}

/// Transaction-scoped advisory lock keyed on the table name, so concurrent
/// loads into the same table run their DDL one after another.
pub(crate) fn build_table_lock(table: &TableRef) -> SelectStatement {
    Query::select()
        .expr(
            Func::cust(Alias::new("pg_advisory_xact_lock"))
                .arg(Func::cust(Alias::new("hashtext")).arg(table.to_string())),
        )
        .to_owned()
}

/// Columns of `table` with their `udt_name`, in table order.
/// Returns no rows when the table does not exist.
pub(crate) fn build_column_types_query(table: &TableRef) -> SelectStatement {
    Query::select()
        .expr_as(
            Expr::col(Alias::new("column_name")).cast_as(Alias::new("text")),
            Alias::new("column_name"),
        )
        .expr_as(
            Expr::col(Alias::new("udt_name")).cast_as(Alias::new("text")),
            Alias::new("udt_name"),
        )
        .from((Alias::new("information_schema"), Alias::new("columns")))
        .and_where(Expr::col(Alias::new("table_schema")).eq(table.schema.as_str()))
        .and_where(Expr::col(Alias::new("table_name")).eq(table.name.as_str()))
        .order_by(Alias::new("ordinal_position"), Order::Asc)
        .to_owned()
}

/// `CREATE TABLE IF NOT EXISTS`, so an existing table is appended to as is.
pub(crate) fn build_create_table(
    table: &TableRef,
    columns: &[String],
    kinds: &[ColumnKind],
) -> TableCreateStatement {
    let mut create = Table::create();
    create
        .table((Alias::new(&table.schema), Alias::new(&table.name)))
        .if_not_exists();

    for (column, kind) in columns.iter().zip(kinds) {
        create.col(&mut column_def(column, kind));
    }

    create
}

/// Adds the given columns to an existing table.
pub(crate) fn build_add_columns(
    table: &TableRef,
    columns: &[(String, ColumnKind)],
) -> TableAlterStatement {
    let mut alter = Table::alter();
    alter.table((Alias::new(&table.schema), Alias::new(&table.name)));

    for (column, kind) in columns {
        alter.add_column_if_not_exists(&mut column_def(column, kind));
    }

    alter
}

/// Splits the frame into multi-row inserts that stay under the bind limit.
pub(crate) fn build_insert_chunks(
    table: &TableRef,
    frame: &HolidayFrame,
    kinds: &[ColumnKind],
) -> Result<Vec<InsertStatement>, Error> {
    let width = frame.columns().len().max(1);
    let rows_per_statement = (MAX_BIND_PARAMS / width).max(1);

    frame
        .rows()
        .chunks(rows_per_statement)
        .map(|chunk| {
            let mut insert = Query::insert();
            insert
                .into_table((Alias::new(&table.schema), Alias::new(&table.name)))
                .columns(frame.columns().iter().map(Alias::new));

            for row in chunk {
                let values = row
                    .iter()
                    .zip(kinds)
                    .map(|(cell, kind)| cell_to_value(kind, cell))
                    .collect::<Result<Vec<SimpleExpr>, _>>()?;

                insert.values(values).map_err(query_error_to_domain)?;
            }

            Ok(insert)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sea_orm::sea_query::PostgresQueryBuilder;

    use super::*;

    fn staged_frame() -> HolidayFrame {
        let staged = "date|localName|fixed|launchYear|counties\n\
                      2023-01-01|Новы год|False||\n\
                      2023-11-07|Дзень Кастрычніцкай рэвалюцыі|True|1991|\n";
        HolidayFrame::from_delimited(staged.as_bytes(), b'|').unwrap()
    }

    #[test]
    fn test_infers_kinds_from_staged_text() {
        let kinds = infer_column_kinds(&staged_frame());

        assert_eq!(
            kinds,
            vec![
                ColumnKind::Text,
                ColumnKind::Text,
                ColumnKind::Boolean,
                ColumnKind::BigInt,
                ColumnKind::Text
            ]
        );
    }

    #[test]
    fn test_mixed_numbers_widen_to_double() {
        let frame = HolidayFrame::new(
            vec!["n".into()],
            vec![vec!["1".into()], vec!["2.5".into()]],
        )
        .unwrap();

        assert_eq!(infer_column_kinds(&frame), vec![ColumnKind::Double]);
    }

    #[test]
    fn test_create_table_targets_schema_qualified_table() {
        let frame = staged_frame();
        let kinds = infer_column_kinds(&frame);
        let sql = build_create_table(&TableRef::default(), frame.columns(), &kinds)
            .to_string(PostgresQueryBuilder);

        assert!(sql.starts_with(r#"CREATE TABLE IF NOT EXISTS "public"."holidays""#));
        assert!(sql.contains(r#""localName" text"#));
        assert!(sql.contains(r#""fixed" bool"#));
        assert!(sql.contains(r#""launchYear" bigint"#));
    }

    #[test]
    fn test_insert_carries_every_row_unchanged() {
        let frame = staged_frame();
        let kinds = infer_column_kinds(&frame);
        let inserts = build_insert_chunks(&TableRef::default(), &frame, &kinds).unwrap();

        assert_eq!(inserts.len(), 1);

        let sql = inserts[0].to_string(PostgresQueryBuilder);
        assert!(sql.starts_with(r#"INSERT INTO "public"."holidays""#));
        assert!(sql.contains("'Дзень Кастрычніцкай рэвалюцыі'"));
        assert!(sql.contains("1991"));
        assert!(sql.contains("NULL"));
    }

    #[test]
    fn test_non_numeric_words_stay_text() {
        let frame = HolidayFrame::new(
            vec!["note".into()],
            vec![vec!["inf".into()], vec!["NaN".into()], vec!["infinity".into()]],
        )
        .unwrap();

        assert_eq!(infer_column_kinds(&frame), vec![ColumnKind::Text]);
    }

    #[test]
    fn test_existing_column_types_win_over_inference() {
        let frame = HolidayFrame::from_delimited(b"date|launchYear|global\n2023-01-01||True\n", b'|')
            .unwrap();
        let existing = vec![
            ("date".to_string(), ColumnKind::from_udt_name("date")),
            ("launchYear".to_string(), ColumnKind::from_udt_name("int8")),
        ];

        let (kinds, missing) = resolve_column_kinds(&frame, &existing);

        assert_eq!(
            kinds,
            vec![
                ColumnKind::Other("date".to_string()),
                ColumnKind::BigInt,
                ColumnKind::Boolean
            ]
        );
        assert_eq!(missing, vec![("global".to_string(), ColumnKind::Boolean)]);
    }

    #[test]
    fn test_empty_cells_insert_untyped_null() {
        let frame = HolidayFrame::from_delimited(b"date|launchYear\n2023-01-01|\n", b'|').unwrap();
        let kinds = vec![ColumnKind::Text, ColumnKind::BigInt];

        let sql = build_insert_chunks(&TableRef::default(), &frame, &kinds).unwrap()[0]
            .to_string(PostgresQueryBuilder);

        assert!(sql.ends_with("VALUES ('2023-01-01', NULL)"), "{sql}");
    }

    #[test]
    fn test_add_columns_alters_existing_table() {
        let sql = build_add_columns(
            &TableRef::default(),
            &[("global".to_string(), ColumnKind::Boolean)],
        )
        .to_string(PostgresQueryBuilder);

        assert!(
            sql.starts_with(
                r#"ALTER TABLE "public"."holidays" ADD COLUMN IF NOT EXISTS "global" bool"#
            ),
            "{sql}"
        );
    }

    #[test]
    fn test_lock_and_schema_queries_target_the_table() {
        let lock = build_table_lock(&TableRef::default()).to_string(PostgresQueryBuilder);
        assert!(lock.contains("pg_advisory_xact_lock"));
        assert!(lock.contains("'public.holidays'"));

        let columns =
            build_column_types_query(&TableRef::default()).to_string(PostgresQueryBuilder);
        assert!(columns.contains(r#"FROM "information_schema"."columns""#));
        assert!(columns.contains(r#""table_schema" = 'public'"#));
        assert!(columns.contains(r#""table_name" = 'holidays'"#));
    }

    #[test]
    fn test_large_frames_are_split_under_bind_limit() {
        let columns: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let rows = vec![vec!["x".to_string(); 10]; 7_000];
        let frame = HolidayFrame::new(columns, rows).unwrap();
        let kinds = infer_column_kinds(&frame);

        let inserts = build_insert_chunks(&TableRef::default(), &frame, &kinds).unwrap();

        assert_eq!(inserts.len(), 2);
    }

    #[test]
    fn test_zero_rows_build_no_inserts() {
        let frame = HolidayFrame::from_delimited(b"date|name\n", b'|').unwrap();
        let kinds = infer_column_kinds(&frame);

        assert!(
            build_insert_chunks(&TableRef::default(), &frame, &kinds)
                .unwrap()
                .is_empty()
        );
    }
}
