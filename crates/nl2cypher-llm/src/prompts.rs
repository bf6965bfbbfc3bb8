//! Prompt templates
//!
//! One system prompt drives Cypher generation; two small ones drive the
//! explanation and suggestion side calls.

use nl2cypher_core::{GenerationParams, GraphSchema, QueryType};

/// Sampling for query generation.
pub const GENERATE_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.1,
    max_tokens: 2048,
};

/// Sampling for explanations and suggestions.
pub const EXPLAIN_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.1,
    max_tokens: 1024,
};

pub const EXPLAIN_SYSTEM: &str =
    "You are a Neo4j expert. Explain Cypher queries in plain, concise language.";

pub const SUGGEST_SYSTEM: &str =
    "You are a Neo4j expert. Suggest concrete improvements to Cypher queries.";

/// Returned in place of suggestions when the suggestion call fails.
pub const NO_SUGGESTIONS: &str = "unable to generate suggestions";

const RULES: &str = "\
# Rules
1. Use single quotes for string values.
2. Use node labels and relationship types exactly as written in the schema; they are case-sensitive.
3. For fuzzy matches use CONTAINS or STARTS WITH instead of =.
4. Use OPTIONAL MATCH for patterns that may not exist.
5. Relationships that are often missing, such as drugs_of between a drug and its producer, must use OPTIONAL MATCH, never MATCH.
6. Keep queries efficient and avoid unbounded traversals.
7. Always state what to return with an explicit RETURN clause.
8. Produce ONE query. Do not emit several MATCH ... RETURN statements.
9. With several relationship types only the first takes a colon: [r:not_eat|do_eat|recommand_eat], never [r:not_eat|:do_eat].
10. AS aliases go outside aggregate calls: COLLECT(DISTINCT d.name) AS drugs, never COLLECT(DISTINCT d.name AS drugs).
11. Disease nodes also carry yibao_status (insurance coverage), get_way (transmission), cost_money and category.
12. Filter empty values with IS NOT NULL and <> '' when a property may be blank.
13. Entity names are stored in Chinese; copy them from the question verbatim.";

const EXAMPLES: &[(&str, &str)] = &[
    (
        "Which drugs are recommended for 高血压?",
        "MATCH (p:Disease)-[r:recommand_drug]-(d:Drug) WHERE p.name='高血压' RETURN d.name",
    ),
    (
        "What are the symptoms of 嗜铬细胞瘤?",
        "MATCH (p:Disease)-[r:has_symptom]-(s:Symptom) WHERE p.name='嗜铬细胞瘤' RETURN s.name",
    ),
    (
        "Which checks does 肺炎 require?",
        "MATCH (p:Disease)-[r:need_check]-(c:Check) WHERE p.name='肺炎' RETURN c.name",
    ),
    (
        "Who produces 阿司匹林?",
        "MATCH (d:Drug) WHERE d.name='阿司匹林' OPTIONAL MATCH (d)-[:drugs_of]->(pr:Producer) RETURN pr.name",
    ),
    (
        "What should a 高血压 patient eat or avoid?",
        "MATCH (d:Disease)-[r:not_eat|do_eat|recommand_eat]-(f:Food) WHERE d.name='高血压' RETURN type(r) AS relationship_type, f.name AS food_name",
    ),
    (
        "How is 肺泡蛋白质沉积症 treated?",
        "MATCH (d:Disease)-[:treated_by]->(t:Treatment) WHERE d.name='肺泡蛋白质沉积症' RETURN d.name, COLLECT(t.name) AS treatments",
    ),
    (
        "Which diseases are covered by insurance?",
        "MATCH (d:Disease) WHERE d.yibao_status='是' RETURN d.name, d.yibao_status",
    ),
];

/// System prompt for natural-language to Cypher generation.
pub fn cypher_system_prompt(schema: &GraphSchema) -> String {
    let mut prompt = String::from(
        "You are an expert Neo4j Cypher generator. Translate the user's question into one \
         accurate, efficient Cypher query.\n\n# Graph schema\n",
    );
    prompt.push_str(&schema.describe());
    prompt.push('\n');
    prompt.push_str(RULES);
    prompt.push_str("\n\n# Examples\n");
    for (question, cypher) in EXAMPLES {
        prompt.push_str(&format!("Question: {question}\nCypher: {cypher}\n\n"));
    }
    prompt.push_str("Now write the Cypher query for the following question:");
    prompt
}

/// User prompt: the question, optionally prefixed with the query type and
/// followed by a result-count hint.
pub fn user_prompt(question: &str, query_type: Option<QueryType>, limit: Option<u32>) -> String {
    let mut prompt = match query_type {
        Some(kind) => format!("{} query: {question}", kind.as_str()),
        None => question.to_string(),
    };
    if let Some(limit) = limit {
        prompt.push_str(&format!("\nReturn at most {limit} results."));
    }
    prompt
}

pub fn explain_prompt(cypher: &str) -> String {
    format!("Explain the following Cypher query: {cypher}")
}

/// Asks for errors and improvement advice on a query that failed validation.
pub fn suggestion_prompt(cypher: &str, errors: &[String]) -> String {
    let mut prompt = format!(
        "Analyse the following Cypher query, point out any errors or potential problems, \
         and suggest improvements:\n\n{cypher}\n"
    );
    if !errors.is_empty() {
        prompt.push_str("\nThe validator reported:\n");
        for error in errors {
            prompt.push_str(&format!("- {error}\n"));
        }
    }
    prompt.push_str("\nAnswer in this format:\nErrors: [all errors]\nSuggestions: [improvements]");
    prompt
}

/// Placeholder explanation used when the explanation call fails.
pub fn explanation_unavailable(error: &impl std::fmt::Display) -> String {
    format!("Unable to generate explanation: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl2cypher_core::{NodeSchema, RelationshipSchema};
    use test_case::test_case;

    #[test]
    fn test_system_prompt_embeds_schema() {
        let schema = GraphSchema::new(
            vec![NodeSchema::named("Gene")],
            vec![RelationshipSchema::new("encodes", "Gene", "Gene")],
        );
        let prompt = cypher_system_prompt(&schema);
        assert!(prompt.contains("(:Gene)-[:encodes]->(:Gene)"));
        assert!(prompt.contains("COLLECT(DISTINCT d.name) AS drugs"));
        assert!(prompt.ends_with("following question:"));
    }

    #[test_case(None, None, "Who makes X?" ; "plain")]
    #[test_case(Some(QueryType::Match), None, "MATCH query: Who makes X?" ; "typed")]
    #[test_case(None, Some(5), "Who makes X?\nReturn at most 5 results." ; "limited")]
    fn test_user_prompt(kind: Option<QueryType>, limit: Option<u32>, expected: &str) {
        assert_eq!(user_prompt("Who makes X?", kind, limit), expected);
    }

    #[test]
    fn test_suggestion_prompt_lists_errors() {
        let prompt = suggestion_prompt("MATCH (x:Foo) RETURN x", &["Unknown node label: Foo".into()]);
        assert!(prompt.contains("MATCH (x:Foo) RETURN x"));
        assert!(prompt.contains("- Unknown node label: Foo"));
    }
}
