//! Built-in statement and schema exclusions
//!
//! Statements a replication task never applies downstream regardless of
//! configuration (account management, stored programs, table maintenance,
//! temporary tables), and the internal schemas of MySQL/TiDB.

use regex::Regex;
use std::sync::LazyLock;

/// Statement prefixes that are always skipped, matched case-insensitively
/// at the start of the statement.
const BUILTIN_SKIP_DDLS: &[&str] = &[
    // transaction
    r"SAVEPOINT",
    // flush
    r"FLUSH",
    // table maintenance
    r"OPTIMIZE\s+TABLE",
    r"ANALYZE\s+TABLE",
    r"REPAIR\s+TABLE",
    // temporary table
    r"DROP\s+(/\*!40005\s+)?TEMPORARY\s+(\*/\s+)?TABLE",
    // trigger
    r"CREATE\s+(DEFINER\s?=.+?)?TRIGGER",
    r"DROP\s+TRIGGER",
    // procedure
    r"DROP\s+PROCEDURE",
    r"CREATE\s+(DEFINER\s?=.+?)?PROCEDURE",
    r"ALTER\s+PROCEDURE",
    // view
    r"CREATE\s*(OR\s+REPLACE)?\s+(ALGORITHM\s?=.+?)?(DEFINER\s?=.+?)?\s*(SQL\s+SECURITY\s+(DEFINER|INVOKER)\s+)?VIEW",
    r"DROP\s+VIEW",
    r"ALTER\s+(ALGORITHM\s?=.+?)?(DEFINER\s?=.+?)?(SQL\s+SECURITY\s+(DEFINER|INVOKER)\s+)?VIEW",
    // user-defined and stored functions
    r"CREATE\s+(AGGREGATE\s+)?FUNCTION",
    r"CREATE\s+(DEFINER\s?=.+?)?FUNCTION",
    r"ALTER\s+FUNCTION",
    r"DROP\s+FUNCTION",
    // tablespace
    r"CREATE\s+TABLESPACE",
    r"ALTER\s+TABLESPACE",
    r"DROP\s+TABLESPACE",
    // event
    r"CREATE\s+(DEFINER\s?=.+?)?EVENT",
    r"ALTER\s+(DEFINER\s?=.+?)?EVENT",
    r"DROP\s+EVENT",
    // account management
    r"GRANT",
    r"REVOKE",
    r"CREATE\s+USER",
    r"ALTER\s+USER",
    r"RENAME\s+USER",
    r"DROP\s+USER",
    r"SET\s+PASSWORD",
];

static BUILTIN_SKIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = BUILTIN_SKIP_DDLS.join("|");
    Regex::new(&format!(r"(?i)^\s*(?:{alternation})"))
        .expect("built-in skip statement patterns are valid")
});

/// Internal schemas that are never replicated.
const SYSTEM_SCHEMAS: &[&str] = &[
    "information_schema",
    "performance_schema",
    "metrics_schema",
    "inspection_schema",
    "mysql",
    "sys",
];

/// Check if a statement matches the built-in skip set.
pub fn is_builtin_skip_ddl(sql: &str) -> bool {
    BUILTIN_SKIP_PATTERN.is_match(sql)
}

/// Check if a schema is one of the database engine's internal schemas.
pub fn is_system_schema(schema: &str) -> bool {
    SYSTEM_SCHEMAS
        .iter()
        .any(|system| system.eq_ignore_ascii_case(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_skip_account_management() {
        assert!(is_builtin_skip_ddl("GRANT ALL PRIVILEGES ON *.* TO 'u'@'%'"));
        assert!(is_builtin_skip_ddl("revoke select on mydb.* from 'u'@'%'"));
        assert!(is_builtin_skip_ddl("CREATE USER 'u'@'%' IDENTIFIED BY 'p'"));
        assert!(is_builtin_skip_ddl("DROP USER 'u'@'%'"));
        assert!(is_builtin_skip_ddl("SET PASSWORD FOR 'u'@'%' = 'x'"));
    }

    #[test]
    fn test_builtin_skip_housekeeping() {
        assert!(is_builtin_skip_ddl("FLUSH TABLES"));
        assert!(is_builtin_skip_ddl("  flush privileges"));
        assert!(is_builtin_skip_ddl("SAVEPOINT sp1"));
        assert!(is_builtin_skip_ddl("ANALYZE TABLE t1"));
        assert!(is_builtin_skip_ddl("optimize table t1"));
        assert!(is_builtin_skip_ddl(
            "DROP /*!40005 TEMPORARY */ TABLE IF EXISTS `tmp_t1`"
        ));
        assert!(is_builtin_skip_ddl("DROP TEMPORARY TABLE tmp_t1"));
    }

    #[test]
    fn test_builtin_skip_stored_programs() {
        assert!(is_builtin_skip_ddl(
            "CREATE DEFINER=`root`@`%` TRIGGER trg BEFORE INSERT ON t1 FOR EACH ROW SET @x = 1"
        ));
        assert!(is_builtin_skip_ddl("CREATE PROCEDURE p() BEGIN END"));
        assert!(is_builtin_skip_ddl("CREATE AGGREGATE FUNCTION f RETURNS STRING SONAME 'x.so'"));
        assert!(is_builtin_skip_ddl("DROP FUNCTION IF EXISTS f"));
        assert!(is_builtin_skip_ddl("CREATE EVENT e ON SCHEDULE EVERY 1 HOUR DO SELECT 1"));
        assert!(is_builtin_skip_ddl("CREATE OR REPLACE VIEW v AS SELECT 1"));
        assert!(is_builtin_skip_ddl(
            "CREATE ALGORITHM=UNDEFINED DEFINER=`root`@`%` SQL SECURITY DEFINER VIEW v AS SELECT 1"
        ));
        assert!(is_builtin_skip_ddl("DROP VIEW v"));
    }

    #[test]
    fn test_builtin_skip_leaves_table_ddl() {
        assert!(!is_builtin_skip_ddl("CREATE TABLE t1 (id INT PRIMARY KEY)"));
        assert!(!is_builtin_skip_ddl("ALTER TABLE t1 ADD COLUMN c INT"));
        assert!(!is_builtin_skip_ddl("DROP TABLE t1"));
        assert!(!is_builtin_skip_ddl("CREATE DATABASE mydb"));
        assert!(!is_builtin_skip_ddl("TRUNCATE TABLE t1"));
        assert!(!is_builtin_skip_ddl("ALTER TABLE t1 ADD COLUMN view INT"));
        assert!(!is_builtin_skip_ddl("INSERT INTO t1 VALUES (1)"));
    }

    #[test]
    fn test_system_schema() {
        assert!(is_system_schema("mysql"));
        assert!(is_system_schema("INFORMATION_SCHEMA"));
        assert!(is_system_schema("performance_schema"));
        assert!(is_system_schema("sys"));
        assert!(is_system_schema("METRICS_SCHEMA"));
        assert!(!is_system_schema("mydb"));
        assert!(!is_system_schema(""));
        assert!(!is_system_schema("mysql_app"));
    }
}
