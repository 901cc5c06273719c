//! Command parser for FernDB
//!
//! Parses one framed command string into a [`Command`]. The language is
//! keyword-prefixed; clauses are located by case-insensitive keyword search
//! and lists split on commas. WHERE conditions are kept raw here and parsed
//! by the condition sublanguage against whichever schema they end up being
//! evaluated on.

use super::ast::{Assignment, Command, DescribeTarget, SelectQuery, ShowTarget};
use crate::catalog::{Attribute, DataType};
use crate::error::{Error, Result};

/// Maximum number of characters a quoted INSERT literal may hold
const MAX_INSERT_TEXT_LEN: usize = 30;

/// Parse an input command string. The input is trimmed and a trailing
/// semicolon (if present) is removed.
pub fn parse(input: &str) -> Result<Command> {
    let mut input = input.trim();
    if let Some(stripped) = input.strip_suffix(';') {
        input = stripped.trim_end();
    }

    if let Some(rest) = strip_keyword(input, "CREATE DATABASE") {
        parse_create_database(rest)
    } else if let Some(rest) = strip_keyword(input, "CREATE TABLE") {
        parse_create_table(rest)
    } else if let Some(rest) = strip_keyword(input, "USE") {
        parse_use(rest)
    } else if let Some(rest) = strip_keyword(input, "DESCRIBE") {
        parse_describe(rest)
    } else if let Some(rest) = strip_keyword(input, "SELECT") {
        Ok(Command::Select(parse_select_query(rest)?))
    } else if let Some(rest) = strip_keyword(input, "LET") {
        parse_let(rest)
    } else if let Some(rest) = strip_keyword(input, "RENAME") {
        parse_rename(rest)
    } else if let Some(rest) = strip_keyword(input, "INSERT") {
        parse_insert(rest)
    } else if let Some(rest) = strip_keyword(input, "UPDATE") {
        parse_update(rest)
    } else if let Some(rest) = strip_keyword(input, "DELETE") {
        parse_delete(rest)
    } else if let Some(rest) = strip_keyword(input, "INPUT") {
        parse_input(rest)
    } else if let Some(rest) = strip_keyword(input, "SHOW") {
        parse_show(rest)
    } else if input.eq_ignore_ascii_case("EXIT") {
        Ok(Command::Exit)
    } else {
        Err(Error::UnsupportedCommand(input.to_string()))
    }
}

// ========== Per-command parsing ==========

fn parse_create_database(rest: &str) -> Result<Command> {
    let name = first_word(rest)
        .ok_or_else(|| syntax("CREATE DATABASE command requires a database name."))?;
    Ok(Command::CreateDatabase {
        name: name.to_string(),
    })
}

fn parse_use(rest: &str) -> Result<Command> {
    let name = first_word(rest).ok_or_else(|| syntax("USE command requires a database name."))?;
    Ok(Command::Use {
        name: name.to_string(),
    })
}

/// CREATE TABLE tableName ( attrName dataType [PRIMARY KEY], ... )
fn parse_create_table(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    let paren_start = rest
        .find('(')
        .ok_or_else(|| syntax("Missing '(' for attribute list."))?;
    let paren_end = rest
        .rfind(')')
        .filter(|&end| end > paren_start)
        .ok_or_else(|| syntax("Missing ')' for attribute list."))?;

    let name = rest[..paren_start].trim();
    if name.is_empty() {
        return Err(syntax("CREATE TABLE command requires a table name."));
    }

    let mut attributes = Vec::new();
    for token in rest[paren_start + 1..paren_end].split(',') {
        let parts: Vec<&str> = token.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(syntax(format!(
                "Invalid attribute definition: {}",
                token.trim()
            )));
        }
        if !Attribute::is_valid_name(parts[0]) {
            return Err(syntax(format!("Invalid attribute name: {}", parts[0])));
        }
        let data_type = DataType::from_keyword(parts[1])
            .ok_or_else(|| syntax(format!("Unknown data type: {}", parts[1].to_uppercase())))?;
        let primary_key = parts.len() >= 3 && parts[2].eq_ignore_ascii_case("PRIMARY");
        attributes.push(Attribute::new(parts[0], data_type, primary_key));
    }

    if attributes.iter().filter(|a| a.primary_key).count() > 1 {
        return Err(syntax("At most one attribute may be marked PRIMARY KEY."));
    }

    Ok(Command::CreateTable {
        name: name.to_string(),
        attributes,
    })
}

fn parse_describe(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(syntax("DESCRIBE command requires a table name or ALL."));
    }
    if rest.eq_ignore_ascii_case("ALL") {
        Ok(Command::Describe(DescribeTarget::All))
    } else {
        Ok(Command::Describe(DescribeTarget::Table(rest.to_string())))
    }
}

/// col1, col2, ... FROM table1 [, table2, ...] [WHERE condition]
fn parse_select_query(rest: &str) -> Result<SelectQuery> {
    let rest = rest.trim();
    let from_index =
        find_keyword(rest, "FROM").ok_or_else(|| syntax("SELECT command must contain FROM clause."))?;

    let columns = split_list(&rest[..from_index]);
    let after_from = &rest[from_index + "FROM".len()..];

    let (tables_part, condition) = match find_keyword(after_from, "WHERE") {
        Some(where_index) => (
            &after_from[..where_index],
            non_blank(&after_from[where_index + "WHERE".len()..]),
        ),
        None => (after_from, None),
    };
    let tables = split_list(tables_part);

    Ok(SelectQuery {
        columns,
        tables,
        condition,
    })
}

/// LET newTableName KEY keyAttribute <SELECT ...>
fn parse_let(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    let key_index = find_keyword(rest, "KEY").ok_or_else(|| syntax("LET command must contain KEY."))?;

    let table = rest[..key_index].trim();
    if table.split_whitespace().count() != 1 {
        return Err(syntax(format!(
            "Table name must be one word. Your name was: {}",
            table
        )));
    }

    let after_key = &rest[key_index + "KEY".len()..];
    let open = after_key
        .find('<')
        .ok_or_else(|| syntax("LET command must supply the query as <SELECT ...>."))?;
    let close = after_key
        .rfind('>')
        .filter(|&c| c > open)
        .ok_or_else(|| syntax("LET command must supply the query as <SELECT ...>."))?;

    let key = after_key[..open].trim();
    if key.split_whitespace().count() != 1 {
        return Err(syntax("KEY name must be one word"));
    }

    let inner = after_key[open + 1..close].trim();
    let select_rest = strip_keyword(inner, "SELECT")
        .ok_or_else(|| syntax("LET command must contain a SELECT operation."))?;

    Ok(Command::Let {
        table: table.to_string(),
        key: key.to_string(),
        query: parse_select_query(select_rest)?,
    })
}

/// RENAME tableName (newAttr1, newAttr2, ...)
fn parse_rename(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    let paren_start = rest.find('(');
    let paren_end = rest.find(')');
    let (Some(start), Some(end)) = (paren_start, paren_end) else {
        return Err(syntax(
            "RENAME command must include new attribute names in parentheses.",
        ));
    };
    if end < start {
        return Err(syntax(
            "RENAME command must include new attribute names in parentheses.",
        ));
    }

    let table = rest[..start].trim();
    let names = split_list(&rest[start + 1..end]);
    for name in &names {
        if !Attribute::is_valid_name(name) {
            return Err(syntax(format!("Invalid attribute name: {}", name)));
        }
    }

    Ok(Command::Rename {
        table: table.to_string(),
        names,
    })
}

/// INSERT tableName VALUES (val1, val2, ..., valN)
fn parse_insert(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    if rest.len() >= 5 && rest.as_bytes()[..5].eq_ignore_ascii_case(b"INTO ") {
        return Err(syntax(
            "INSERT command must be: INSERT <table> VALUES (...); (no INTO allowed)",
        ));
    }

    let values_index =
        find_keyword(rest, "VALUES").ok_or_else(|| syntax("INSERT command must contain VALUES."))?;
    let table = rest[..values_index].trim();

    let values_part = rest[values_index + "VALUES".len()..].trim();
    if !values_part.starts_with('(') || !values_part.ends_with(')') {
        return Err(syntax("VALUES must be enclosed in parentheses."));
    }

    let mut values = Vec::new();
    for raw in values_part[1..values_part.len() - 1].split(',') {
        let raw = raw.trim();
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            let literal = &raw[1..raw.len() - 1];
            if literal.chars().count() > MAX_INSERT_TEXT_LEN {
                return Err(syntax(format!(
                    "Text literal exceeds {} characters: {}",
                    MAX_INSERT_TEXT_LEN, raw
                )));
            }
        }
        values.push(strip_quotes(raw).to_string());
    }

    Ok(Command::Insert {
        table: table.to_string(),
        values,
    })
}

/// UPDATE tableName SET attr=value [, attr=value]* [WHERE condition]
fn parse_update(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    let set_index =
        find_keyword(rest, "SET").ok_or_else(|| syntax("UPDATE command must contain SET."))?;
    let table = rest[..set_index].trim();

    let mut updates_part = &rest[set_index + "SET".len()..];
    let condition = match find_keyword(updates_part, "WHERE") {
        Some(where_index) => {
            let cond = non_blank(&updates_part[where_index + "WHERE".len()..]);
            updates_part = &updates_part[..where_index];
            cond
        }
        None => None,
    };

    let mut assignments = Vec::new();
    for assign in updates_part.split(',') {
        let parts: Vec<&str> = assign.split('=').collect();
        if parts.len() != 2 {
            return Err(syntax(format!("Invalid assignment: {}", assign.trim())));
        }
        assignments.push(Assignment {
            attribute: parts[0].trim().to_string(),
            value: strip_quotes(parts[1].trim()).to_string(),
        });
    }

    Ok(Command::Update {
        table: table.to_string(),
        assignments,
        condition,
    })
}

/// DELETE tableName [WHERE condition]
fn parse_delete(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    let (table, condition) = match find_keyword(rest, "WHERE") {
        Some(where_index) => (
            rest[..where_index].trim(),
            non_blank(&rest[where_index + "WHERE".len()..]),
        ),
        None => (rest, None),
    };

    Ok(Command::Delete {
        table: table.to_string(),
        condition,
    })
}

/// SHOW DATABASES | SHOW TABLES | SHOW RECORDS tableName
fn parse_show(rest: &str) -> Result<Command> {
    let mut tokens = rest.split_whitespace();
    let sub = tokens.next().ok_or_else(|| {
        syntax("SHOW command requires parameters (e.g., DATABASES, TABLES, RECORDS <tableName>).")
    })?;

    if sub.eq_ignore_ascii_case("DATABASES") {
        Ok(Command::Show(ShowTarget::Databases))
    } else if sub.eq_ignore_ascii_case("TABLES") {
        Ok(Command::Show(ShowTarget::Tables))
    } else if sub.eq_ignore_ascii_case("RECORDS") {
        let table = tokens
            .next()
            .ok_or_else(|| syntax("SHOW RECORDS command requires a table name."))?;
        Ok(Command::Show(ShowTarget::Records(table.to_string())))
    } else {
        Err(syntax(format!(
            "Invalid SHOW command parameter: {}",
            sub.to_uppercase()
        )))
    }
}

/// INPUT fileName1 [OUTPUT fileName2]
fn parse_input(rest: &str) -> Result<Command> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let file = tokens
        .first()
        .ok_or_else(|| syntax("INPUT command requires at least an input file."))?;

    let output = if tokens.len() >= 2 && tokens[1].eq_ignore_ascii_case("OUTPUT") {
        let out_file = tokens
            .get(2)
            .ok_or_else(|| syntax("OUTPUT file name missing."))?;
        Some(out_file.to_string())
    } else {
        None
    };

    Ok(Command::Input {
        file: file.to_string(),
        output,
    })
}

// ========== Helpers ==========

fn syntax(message: impl Into<String>) -> Error {
    Error::Syntax(message.into())
}

/// Strip a leading keyword (case-insensitive); the keyword must be followed
/// by whitespace, a delimiter, or the end of input.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let bytes = input.as_bytes();
    if bytes.len() < keyword.len()
        || !bytes[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
    {
        return None;
    }
    let rest = &input[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest),
        Some(_) => None,
    }
}

/// Case-insensitive substring search (keywords are ASCII)
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let k = keyword.as_bytes();
    if k.is_empty() || h.len() < k.len() {
        return None;
    }
    (0..=h.len() - k.len()).find(|&i| h[i..i + k.len()].eq_ignore_ascii_case(k))
}

fn first_word(input: &str) -> Option<&str> {
    input.split_whitespace().next()
}

/// Split a comma-separated list, trimming each entry
fn split_list(input: &str) -> Vec<String> {
    input.split(',').map(|s| s.trim().to_string()).collect()
}

/// None when the clause body is empty after trimming
fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trim one surrounding double quote from each end
fn strip_quotes(token: &str) -> &str {
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token)
}
