// CSV reader: turns the operator's guest list into `GuestUserRecord`s.
// Values are passed through untouched; ISE does the validation.

use crate::error::ImportError;
use csv::StringRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Guest type used when the CSV has no `guestType` column or leaves it blank.
pub const DEFAULT_GUEST_TYPE: &str = "Sponsor-Defined";

/// Columns every row must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "firstName",
    "lastName",
    "userName",
    "emailAddress",
    "password",
    "fromDate",
    "toDate",
];

fn default_guest_type() -> String {
    DEFAULT_GUEST_TYPE.to_string()
}

/// One row of the input file. Dates are kept in ISE's own format
/// (e.g. `07/21/2025 00:00`) and never parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUserRecord {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email_address: String,
    pub password: String,
    #[serde(default = "default_guest_type")]
    pub guest_type: String,
    pub from_date: String,
    pub to_date: String,
}

/// First required column the header row does not name.
fn missing_header(headers: &StringRecord) -> Option<&'static str> {
    REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
}

/// First required column a short row stops before.
fn missing_value(headers: &StringRecord, row: &StringRecord) -> Option<&'static str> {
    REQUIRED_COLUMNS.into_iter().find(|column| {
        headers
            .iter()
            .position(|h| h == *column)
            .is_some_and(|i| i >= row.len())
    })
}

/// Read every guest user from the CSV file at `path`, in file order.
pub fn read_guest_users<P: AsRef<Path>>(path: P) -> Result<Vec<GuestUserRecord>, ImportError> {
    let file = File::open(path.as_ref())?;
    let users = parse_guest_users(file)?;
    debug!(count = users.len(), "read guest users");
    Ok(users)
}

/// Parse guest users from any reader. The csv reader drops a leading
/// byte-order mark, and only header names are trimmed.
pub fn parse_guest_users<R: Read>(reader: R) -> Result<Vec<GuestUserRecord>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true) // short rows are reported as missing fields below
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(column) = missing_header(&headers) {
        return Err(ImportError::MissingField { column, row: 1 });
    }

    let mut users = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        let row_index = i + 1;
        if let Some(column) = missing_value(&headers, &row) {
            return Err(ImportError::MissingField {
                column,
                row: row_index,
            });
        }

        let mut user: GuestUserRecord = row.deserialize(Some(&headers))?;
        if user.guest_type.trim().is_empty() {
            user.guest_type = default_guest_type();
        }
        debug!(row = row_index, user = %user.user_name, "parsed guest user");
        users.push(user);
    }
    Ok(users)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const HEADER: &str =
        "firstName,lastName,userName,emailAddress,password,fromDate,toDate";

    /// Builds a record the way the CSV reader would for a row without guestType.
    pub(crate) fn sample_user(user_name: &str) -> GuestUserRecord {
        GuestUserRecord {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            user_name: user_name.into(),
            email_address: format!("{user_name}@example.com"),
            password: "Secret123".into(),
            guest_type: DEFAULT_GUEST_TYPE.into(),
            from_date: "07/21/2025 00:00".into(),
            to_date: "07/22/2025 23:59".into(),
        }
    }

    fn parse(input: &str) -> Result<Vec<GuestUserRecord>, ImportError> {
        parse_guest_users(input.as_bytes())
    }

    #[test]
    fn test_reads_example_row() {
        let input = format!(
            "{HEADER}\nJane,Doe,jdoe,jdoe@example.com,Secret123,07/21/2025 00:00,07/22/2025 23:59"
        );
        let users = parse(&input).unwrap();
        assert_eq!(users, vec![sample_user("jdoe")]);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(25)]
    fn test_one_record_per_data_row_in_order(#[case] rows: usize) {
        let mut input = HEADER.to_string();
        for i in 0..rows {
            input.push_str(&format!(
                "\nJane,Doe,user{i},user{i}@example.com,pw,07/21/2025 00:00,07/22/2025 23:59"
            ));
        }
        let users = parse(&input).unwrap();
        assert_eq!(users.len(), rows);
        for (i, user) in users.iter().enumerate() {
            assert_eq!(user.user_name, format!("user{i}"));
        }
    }

    #[rstest]
    #[case("guestType\nContractor", "Contractor")]
    #[case("guestType\n", DEFAULT_GUEST_TYPE)]
    #[case("guestType\n   ", DEFAULT_GUEST_TYPE)]
    fn test_guest_type_column(#[case] extra: &str, #[case] expected: &str) {
        // Appends the guestType column header and value to a valid row.
        let (extra_header, extra_value) = extra.split_once('\n').unwrap();
        let input = format!(
            "{HEADER},{extra_header}\nJane,Doe,jdoe,jdoe@example.com,pw,a,b,{extra_value}"
        );
        let users = parse(&input).unwrap();
        assert_eq!(users[0].guest_type, expected);
    }

    #[rstest]
    #[case("firstName")]
    #[case("lastName")]
    #[case("userName")]
    #[case("emailAddress")]
    #[case("password")]
    #[case("fromDate")]
    #[case("toDate")]
    fn test_missing_column_is_named(#[case] missing: &'static str) {
        let header: Vec<&str> = HEADER.split(',').filter(|c| *c != missing).collect();
        let values: Vec<&str> = header.iter().map(|_| "x").collect();
        let input = format!("{}\n{}\n{}", header.join(","), values.join(","), values.join(","));

        match parse(&input) {
            Err(ImportError::MissingField { column, row }) => {
                assert_eq!(column, missing);
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_short_row_reports_its_index() {
        let input = format!(
            "{HEADER}\nJane,Doe,jdoe,jdoe@example.com,pw,a,b\nJohn,Roe,jroe,jroe@example.com,pw,a"
        );
        match parse(&input) {
            Err(ImportError::MissingField { column, row }) => {
                assert_eq!(column, "toDate");
                assert_eq!(row, 2);
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_are_ignored_and_values_kept_verbatim() {
        let input = "notes, firstName ,lastName,userName,emailAddress,password,fromDate,toDate\n\
                     hello, Jane ,Doe,jdoe,jdoe@example.com, Secret 123 ,a,b";
        let users = parse(input).unwrap();
        assert_eq!(users[0].first_name, " Jane ");
        assert_eq!(users[0].last_name, "Doe");
        assert_eq!(users[0].password, " Secret 123 ");
    }

    #[test]
    fn test_header_only_file_missing_column_fails() {
        let input = "firstName,lastName,userName,emailAddress,password,fromDate\n";
        match parse(input) {
            Err(ImportError::MissingField { column, row }) => {
                assert_eq!(column, "toDate");
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_short_row_under_optional_column_uses_default_guest_type() {
        let input = format!("{HEADER},guestType\nJane,Doe,jdoe,jdoe@example.com,pw,a,b");
        let users = parse(&input).unwrap();
        assert_eq!(users[0].guest_type, DEFAULT_GUEST_TYPE);
    }

    #[test]
    fn test_file_with_byte_order_mark() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"\xEF\xBB\xBF").unwrap();
        writeln!(
            temp_file,
            "{HEADER}\nJane,Doe,jdoe,jdoe@example.com,Secret123,07/21/2025 00:00,07/22/2025 23:59"
        )
        .unwrap();

        let users = read_guest_users(temp_file.path()).unwrap();
        assert_eq!(users, vec![sample_user("jdoe")]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_guest_users("non_existent_guests_12345.csv");
        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
