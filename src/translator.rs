//! Natural language to SQL query translation using configurable LLM providers.

use tracing::{info, warn};

use crate::factory::{ProviderFactory, ProviderParams};
use crate::provider::LlmProvider;
use crate::Error;

/// Instructional context sent with every translation request. Process-wide
/// static data; describes the DuckDB Eurostat extension surface the model is
/// allowed to use and instructs it to answer with a single bare SQL statement.
pub(crate) const SYSTEM_PROMPT: &str = r#"You are a SQL expert specializing in the DuckDB Eurostat extension.

The DuckDB Eurostat extension provides these main functions:

1. EUROSTAT_Endpoints() - Lists available providers (ESTAT, ECFIN, EMPL, GROW, TAXUD)
2. EUROSTAT_Dataflows([providers], [dataflows], language) - Lists available datasets
3. EUROSTAT_DataStructure(provider_id, dataflow_id, language) - Shows dataset structure
4. EUROSTAT_Read(provider_id, dataflow_id, [filters]) - Reads actual data

Common dataflows:
- DEMO_R_D2JAN: Population by age, sex, and NUTS-2 region
- UNE_RT_A: Unemployment rates
- NAMA_10_GDP: GDP and main components
- PRC_HICP_MIDX: HICP - Monthly index

When translating queries:
1. Use EUROSTAT_Read() to fetch actual data
2. Apply WHERE filters for dimensions (geo, time_period, etc.)
3. The extension supports pushdown filters: WHERE geo = 'DE' or WHERE geo IN ('DE', 'FR')
4. Time filters: WHERE time_period >= '2020' AND time_period <= '2023'
5. Always specify provider_id (usually 'ESTAT') and dataflow_id
6. Use language := 'en' for English labels

Examples:
- "Population of Germany in 2020" ->
  SELECT * FROM EUROSTAT_Read('ESTAT', 'DEMO_R_D2JAN')
  WHERE geo = 'DE' AND time_period = '2020'

- "Unemployment rates for EU countries" ->
  SELECT * FROM EUROSTAT_Read('ESTAT', 'UNE_RT_A')
  WHERE geo_level = 'country'

Return ONLY the SQL query, no explanations or markdown formatting."#;

/// Statement keywords the translator will hand to the execution layer.
/// Read-only DuckDB forms only; the model output is rejected otherwise.
const ALLOWED_STATEMENTS: [&str; 6] = [
    "SELECT",
    "WITH",
    "SHOW",
    "DESCRIBE",
    "SUMMARIZE",
    "EXPLAIN",
];

/// Keywords that mark where SQL starts when the model wraps its answer in
/// prose. Broader than the allow-list so a data-modifying statement is found
/// and then rejected instead of being skipped as commentary.
const SQL_STATEMENTS: [&str; 14] = [
    "SELECT",
    "WITH",
    "SHOW",
    "DESCRIBE",
    "SUMMARIZE",
    "EXPLAIN",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE",
    "DROP",
    "ALTER",
    "TRUNCATE",
    "PRAGMA",
];

/// Translates natural language questions about Eurostat data into SQL using
/// an injected LLM provider.
pub struct QueryTranslator {
    provider: Box<dyn LlmProvider>,
}

impl QueryTranslator {
    /// Create a translator around a pre-configured provider.
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        if !provider.is_configured() {
            warn!(
                provider = provider.name(),
                "provider not configured; natural language queries will not work"
            );
        }
        Self { provider }
    }

    /// Create a translator by constructing the provider from an identifier
    /// and parameters.
    pub fn from_kind(kind: &str, params: ProviderParams) -> Result<Self, Error> {
        Ok(Self::new(ProviderFactory::create(kind, params)?))
    }

    /// The provider this translator sends requests through.
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Translate a natural language question into a single executable SQL
    /// statement.
    ///
    /// The raw completion is sanitized (code fences and surrounding prose
    /// stripped, collapsed to the first statement, terminators trimmed) and
    /// then validated against a read-only statement allow-list; text that does
    /// not survive both is never returned to the caller.
    pub async fn translate(&self, question: &str) -> Result<String, Error> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }
        if !self.provider.is_configured() {
            return Err(Error::ProviderUnavailable {
                provider: self.provider.name(),
            });
        }

        let user_message = format!("Translate this question to SQL: {question}");
        let raw = self
            .provider
            .generate(SYSTEM_PROMPT, &user_message)
            .await
            .map_err(|e| Error::TranslationFailed(Box::new(e)))?;

        let sql = sanitize(&raw);
        if sql.is_empty() {
            warn!(
                provider = self.provider.name(),
                "model output contained no SQL statement"
            );
            return Err(Error::UnsafeTranslation {
                statement: raw.trim().to_string(),
            });
        }
        if !is_allowed(&sql) {
            warn!(
                provider = self.provider.name(),
                statement = %sql,
                "model produced a statement outside the allow-list"
            );
            return Err(Error::UnsafeTranslation { statement: sql });
        }

        info!(provider = self.provider.name(), sql = %sql, "translated question");
        Ok(sql)
    }
}

/// Reduce a raw completion to its first SQL statement.
///
/// Drops code-fence markers and any prose before the first line that starts
/// with a SQL keyword, cuts the statement at the first paragraph break or
/// top-level semicolon, and trims trailing terminators. Returns an empty
/// string when no SQL-looking line exists at all.
fn sanitize(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();

    let Some(start) = lines.iter().position(|line| {
        !is_fence(line) && leading_keyword(line).is_some_and(|kw| is_sql_statement(&kw))
    }) else {
        return String::new();
    };

    // a closing fence or a paragraph break ends the statement
    let statement_lines: Vec<&str> = lines[start..]
        .iter()
        .take_while(|line| !line.trim().is_empty() && !is_fence(line))
        .copied()
        .collect();

    let statement = statement_lines.join("\n");
    first_statement(&statement)
        .trim()
        .trim_end_matches(';')
        .trim_end()
        .to_string()
}

/// Cut at the first semicolon outside a string literal.
fn first_statement(text: &str) -> &str {
    let mut in_string = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '\'' => in_string = !in_string,
            ';' if !in_string => return &text[..idx],
            _ => {}
        }
    }
    text
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// First word of the line, uppercased.
fn leading_keyword(line: &str) -> Option<String> {
    let word: String = line
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    (!word.is_empty()).then(|| word.to_ascii_uppercase())
}

fn is_sql_statement(keyword: &str) -> bool {
    SQL_STATEMENTS.contains(&keyword)
}

fn is_allowed(sql: &str) -> bool {
    leading_keyword(sql).is_some_and(|kw| ALLOWED_STATEMENTS.contains(&kw.as_str()))
}
