use sqlparser::{
    ast::{
        Expr, FunctionArg, FunctionArgExpr, FunctionArguments, Select, SelectItem, SetExpr,
        Statement, TableFactor,
    },
    dialect::SQLiteDialect,
    parser::Parser,
};

use crate::planner::{command::Command, error::PlannerError};

pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    /// Map one input line to a `Command`. Dot-commands are matched
    /// textually; everything else goes through the SQL grammar.
    pub fn parse(&self, input: &str) -> Result<Command, PlannerError> {
        let trimmed = input.trim();
        match trimmed {
            ".dbinfo" => return Ok(Command::DbInfo),
            ".tables" => return Ok(Command::Tables),
            _ => {}
        }
        if trimmed.starts_with('.') || trimmed.is_empty() {
            return Err(PlannerError::InvalidCommand(trimmed.to_string()));
        }
        let dialect = SQLiteDialect {};
        let statements = Parser::parse_sql(&dialect, trimmed)?;
        let [statement] = statements.as_slice() else {
            return Err(PlannerError::InvalidCommand(
                "expected exactly one statement".to_string(),
            ));
        };
        self.to_command(statement)
    }

    fn to_command(&self, statement: &Statement) -> Result<Command, PlannerError> {
        let query = match statement {
            Statement::Query(query) => query,
            other => return Err(PlannerError::UnsupportedStatement(other.to_string())),
        };
        let select = match query.body.as_ref() {
            SetExpr::Select(select) => select.as_ref(),
            other => return Err(PlannerError::UnsupportedStatement(other.to_string())),
        };
        if select.selection.is_some() {
            return Err(PlannerError::UnsupportedStatement(
                "WHERE clauses are not supported".to_string(),
            ));
        }
        let table = Self::table_name(select)?;
        if Self::is_count_star(select) {
            return Ok(Command::CountRows { table });
        }
        let mut columns = Vec::with_capacity(select.projection.len());
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(Expr::Identifier(ident)) => {
                    columns.push(ident.value.clone());
                }
                other => return Err(PlannerError::UnsupportedExpression(other.to_string())),
            }
        }
        Ok(Command::Select { table, columns })
    }

    fn table_name(select: &Select) -> Result<String, PlannerError> {
        let [from] = select.from.as_slice() else {
            return Err(PlannerError::UnsupportedStatement(
                "single-table queries only".to_string(),
            ));
        };
        if !from.joins.is_empty() {
            return Err(PlannerError::UnsupportedStatement(
                "joins are not supported".to_string(),
            ));
        }
        match &from.relation {
            TableFactor::Table { name, .. } => Ok(name.to_string()),
            other => Err(PlannerError::UnsupportedExpression(other.to_string())),
        }
    }

    // `count(*)` is the only aggregate the engine answers.
    fn is_count_star(select: &Select) -> bool {
        let [SelectItem::UnnamedExpr(Expr::Function(function))] = select.projection.as_slice()
        else {
            return false;
        };
        if !function.name.to_string().eq_ignore_ascii_case("count") {
            return false;
        }
        match &function.args {
            FunctionArguments::List(list) => {
                matches!(
                    list.args.as_slice(),
                    [FunctionArg::Unnamed(FunctionArgExpr::Wildcard)]
                )
            }
            _ => false,
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
