//! 生成したSELECT文に対する性質テスト

use proptest::prelude::*;
use sql_layout::config::LayoutConfig;
use sql_layout::format_text;
use sql_layout::formatter::format_node;
use sql_layout::lexer::tokenize;
use sql_layout::parser::parse;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn ident() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id"),
        Just("name"),
        Just("total"),
        Just("user_id"),
        Just("created_at"),
    ]
    .prop_map(String::from)
}

fn table() -> impl Strategy<Value = String> {
    prop_oneof![Just("users"), Just("orders"), Just("t"), Just("u")].prop_map(String::from)
}

fn column() -> impl Strategy<Value = Vec<String>> {
    prop_oneof![
        ident().prop_map(|c| vec![c]),
        (table(), ident()).prop_map(|(t, c)| vec![t, ".".into(), c]),
        (ident(), 0u32..100).prop_map(|(c, n)| vec![c, "+".into(), n.to_string()]),
        ident().prop_map(|c| vec!["count".into(), "(".into(), c, ")".into()]),
        (ident(), ident()).prop_map(|(c, a)| vec![c, "AS".into(), format!("{a}_x")]),
        Just(words(&["*"])),
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z]{0,6}".prop_map(|s| format!("'{s}'")),
        ident(),
    ]
}

fn condition() -> impl Strategy<Value = Vec<String>> {
    let op = prop_oneof![Just("="), Just("<>"), Just("!="), Just("<"), Just(">=")];
    prop_oneof![
        (ident(), op, value()).prop_map(|(c, op, v)| vec![c, op.to_string(), v]),
        (ident(), 0u32..10, 10u32..20).prop_map(|(c, lo, hi)| {
            vec![c, "BETWEEN".into(), lo.to_string(), "AND".into(), hi.to_string()]
        }),
        ident().prop_map(|c| vec![c, "IS".into(), "NULL".into()]),
        (ident(), 0u32..10, 0u32..10).prop_map(|(c, a, b)| {
            vec![c, "IN".into(), "(".into(), a.to_string(), ",".into(), b.to_string(), ")".into()]
        }),
    ]
}

fn join() -> impl Strategy<Value = Vec<String>> {
    let keyword = prop_oneof![
        Just("JOIN"),
        Just("LEFT JOIN"),
        Just("INNER JOIN"),
        Just("LEFT OUTER JOIN"),
        Just("CROSS JOIN"),
    ];
    (keyword, table(), ident(), ident()).prop_map(|(kw, t, a, b)| {
        let mut out: Vec<String> = kw.split(' ').map(String::from).collect();
        out.extend([t.clone(), "ON".into(), "x".into(), ".".into(), a]);
        out.extend(["=".into(), t, ".".into(), b]);
        out
    })
}

/// SELECT文1つのトークン列と、LIMIT 句を含むかどうか
fn select_statement() -> impl Strategy<Value = (Vec<String>, bool)> {
    (
        prop::collection::vec(column(), 1..4),
        table(),
        any::<bool>(),
        prop::option::of(ident()),
        prop::collection::vec(join(), 0..3),
        prop::option::of((prop::collection::vec(condition(), 1..4), any::<bool>())),
        prop::option::of(ident()),
        prop::option::of(0u32..500),
        any::<bool>(),
    )
        .prop_map(
            |(columns, from, comment, alias, joins, filter, group, limit, lower)| {
                let mut out = words(&["SELECT"]);
                for (i, column) in columns.into_iter().enumerate() {
                    if i > 0 {
                        out.push(",".into());
                    }
                    out.extend(column);
                }
                out.push("FROM".into());
                out.push(from);
                if comment {
                    out.push("/* note */".into());
                }
                out.extend(alias);
                for join in joins {
                    out.extend(join);
                }
                if let Some((conditions, use_or)) = filter {
                    out.push("WHERE".into());
                    for (i, condition) in conditions.into_iter().enumerate() {
                        if i > 0 {
                            out.push(if use_or { "OR" } else { "AND" }.into());
                        }
                        out.extend(condition);
                    }
                }
                if let Some(group) = group {
                    out.extend(words(&["GROUP", "BY"]));
                    out.push(group);
                }
                let has_limit = limit.is_some();
                if let Some(limit) = limit {
                    out.push("LIMIT".into());
                    out.push(limit.to_string());
                }
                if lower {
                    for word in out.iter_mut() {
                        if word.chars().all(|c| c.is_ascii_uppercase()) {
                            *word = word.to_ascii_lowercase();
                        }
                    }
                }
                (out, has_limit)
            },
        )
}

/// トークン列を、ランダムな空白で区切って1つのテキストにする
fn spaced(tokens: Vec<String>) -> impl Strategy<Value = String> {
    let separator = prop_oneof![Just(" "), Just("  "), Just("\n"), Just("\t"), Just("\n    ")];
    let count = tokens.len();
    prop::collection::vec(separator, count).prop_map(move |seps| {
        let mut text = String::new();
        for (token, sep) in tokens.iter().zip(seps) {
            text.push_str(token);
            text.push_str(sep);
        }
        text
    })
}

fn statement_text() -> impl Strategy<Value = (String, bool)> {
    select_statement().prop_flat_map(|(tokens, has_limit)| {
        spaced(tokens).prop_map(move |text| (text, has_limit))
    })
}

/// `;` で区切った複数の文
fn script() -> impl Strategy<Value = String> {
    (prop::collection::vec(statement_text(), 1..4), any::<bool>()).prop_map(
        |(statements, trailing_comment)| {
            let mut script = statements
                .into_iter()
                .map(|(text, _)| text)
                .collect::<Vec<_>>()
                .join(";\n");
            if trailing_comment {
                script.push_str("-- end of script");
            }
            script
        },
    )
}

fn significant_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .unwrap()
        .into_iter()
        .filter(|t| !t.is_whitespace())
        .map(|t| t.text)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn formatting_is_idempotent(script in script()) {
        let once = format_text(&script).unwrap();
        let twice = format_text(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn tokens_are_preserved_in_order(script in script()) {
        let formatted = format_text(&script).unwrap();
        prop_assert_eq!(significant_tokens(&script), significant_tokens(&formatted));
    }

    #[test]
    fn indentation_is_a_non_negative_multiple_of_the_unit(
        script in script(),
        width in 1usize..5,
    ) {
        let config = LayoutConfig { indent_width: width, use_tabs: false };
        let root = parse(&script).unwrap();
        let formatted = format_node(&root, &config);
        for line in formatted.text.lines() {
            let leading = line.len() - line.trim_start_matches(' ').len();
            prop_assert_eq!(leading % width, 0, "line {:?}", line);
            prop_assert!(!line.starts_with('\t'));
        }
    }

    /// 段数のずれを固定する: 規則表は段数を対にしないので、LIMIT が無い
    /// SELECT文は1段深いまま終わる。負にはならない
    #[test]
    fn indent_drift_is_pinned((text, has_limit) in statement_text()) {
        let root = parse(&text).unwrap();
        let formatted = format_node(&root, &LayoutConfig::default());
        prop_assert_eq!(formatted.lowest_indent_level, 0);
        prop_assert_eq!(formatted.final_indent_level, if has_limit { 0 } else { 1 });
    }

    #[test]
    fn arbitrary_text_never_panics(
        input in prop::collection::vec(any::<char>(), 0..512)
            .prop_map(|chars| chars.into_iter().collect::<String>())
    ) {
        let _ = format_text(&input);
    }
}
