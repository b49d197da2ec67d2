use std::ops::Range;

use serde::Serialize;

use crate::core::{
    candidate::Candidate,
    dialect::{AttributeSite, BindingSyntax, Dialect, DialectProbe, SyntacticContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanKind {
    Call,
    AttributeBinding,
    Interpolation,
}

/// One edit: replace `range` of the buffer with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementPlan {
    pub range: Range<usize>,
    pub text: String,
    pub kind: PlanKind,
}

/// `fn('key')` with the given quote.
pub fn call_expression(function_name: &str, key: &str, quote: char) -> String {
    format!("{0}({1}{2}{1})", function_name, quote, key)
}

/// The other string quote, used when `quote` would clash with an enclosing delimiter.
pub fn opposite_quote(quote: char) -> char {
    if quote == '"' { '\'' } else { '"' }
}

/// Build the edit that swaps a candidate for an i18n call.
///
/// Without a dialect, or when the dialect cannot classify the candidate, the
/// plan falls back to the bare call over the literal (quotes included when the
/// candidate was quoted).
pub fn synthesize(
    candidate: &Candidate,
    key: &str,
    function_name: &str,
    quote: char,
    probe: Option<&Dialect>,
) -> ReplacementPlan {
    let Some(dialect) = probe else {
        return literal_plan(candidate, call_expression(function_name, key, quote), None);
    };

    match dialect.classify(candidate.start) {
        Ok(SyntacticContext::AttributeValue(site)) => match dialect.binding_syntax() {
            Some(binding) => attribute_plan(candidate, key, function_name, quote, &site, binding),
            None => literal_plan(candidate, call_expression(function_name, key, quote), Some(dialect)),
        },
        Ok(SyntacticContext::InterpolationExpr { wrapped: false }) => {
            let call = call_expression(function_name, key, quote);
            match dialect.interpolation() {
                Some((open, close)) => ReplacementPlan {
                    range: candidate.range(),
                    text: format!("{}{}{}", open, call, close),
                    kind: PlanKind::Interpolation,
                },
                None => literal_plan(candidate, call, Some(dialect)),
            }
        }
        Ok(_) => literal_plan(candidate, call_expression(function_name, key, quote), Some(dialect)),
        Err(err) => {
            log::debug!("{} probe: {}, falling back to plain call", dialect.name(), err);
            literal_plan(candidate, call_expression(function_name, key, quote), None)
        }
    }
}

fn attribute_plan(
    candidate: &Candidate,
    key: &str,
    function_name: &str,
    quote: char,
    site: &AttributeSite,
    binding: BindingSyntax,
) -> ReplacementPlan {
    if site.bound {
        // Keep the binding, swap only the literal
        let call_quote = if site.delimiter == Some(quote) {
            opposite_quote(quote)
        } else {
            quote
        };
        return ReplacementPlan {
            range: quoted_range(candidate),
            text: call_expression(function_name, key, call_quote),
            kind: PlanKind::Call,
        };
    }

    let call = call_expression(function_name, key, quote);
    let text = match binding {
        BindingSyntax::Colon => {
            let delimiter = opposite_quote(quote);
            format!(":{0}={1}{2}{1}", site.name, delimiter, call)
        }
        BindingSyntax::Brace => format!("{}={{{}}}", site.name, call),
    };
    ReplacementPlan {
        range: site.range.clone(),
        text,
        kind: PlanKind::AttributeBinding,
    }
}

/// Replace the literal, widening over its quotes when they are present.
fn literal_plan(candidate: &Candidate, call: String, dialect: Option<&Dialect>) -> ReplacementPlan {
    let range = match (dialect, candidate.quote) {
        (Some(dialect), Some(quote)) => {
            let adjacent = dialect.char_before(candidate.start) == Some(quote)
                && dialect.char_at(candidate.end) == Some(quote);
            if adjacent {
                quoted_range(candidate)
            } else {
                candidate.range()
            }
        }
        (None, Some(_)) => quoted_range(candidate),
        (_, None) => candidate.range(),
    };
    ReplacementPlan {
        range,
        text: call,
        kind: PlanKind::Call,
    }
}

fn quoted_range(candidate: &Candidate) -> Range<usize> {
    match candidate.quote {
        Some(quote) => {
            let width = quote.len_utf8();
            candidate.start.saturating_sub(width)..candidate.end + width
        }
        None => candidate.range(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::scanner::scan;

    fn apply(text: &str, plan: &ReplacementPlan) -> String {
        let mut out = text.to_string();
        out.replace_range(plan.range.clone(), &plan.text);
        out
    }

    fn first_candidate(text: &str, names: &[&str]) -> Candidate {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        scan(text, &names).into_iter().next().unwrap()
    }

    #[test]
    fn test_vue_plain_attribute_becomes_binding() {
        let text = "<template>\n  <button title=\"远程开门\"></button>\n</template>";
        let candidate = first_candidate(text, &[]);
        let dialect = Dialect::detect(Path::new("Door.vue"), text);

        let plan = synthesize(&candidate, "common.ok", "t", '\'', Some(&dialect));
        assert_eq!(plan.kind, PlanKind::AttributeBinding);
        assert_eq!(&text[plan.range.clone()], "title=\"远程开门\"");
        assert_eq!(plan.text, ":title=\"t('common.ok')\"");
        assert_eq!(
            apply(text, &plan),
            "<template>\n  <button :title=\"t('common.ok')\"></button>\n</template>"
        );
    }

    #[test]
    fn test_vue_binding_uses_opposite_delimiter() {
        let text = "<template><i title='提示'></i></template>";
        let candidate = first_candidate(text, &[]);
        let dialect = Dialect::detect(Path::new("a.vue"), text);

        let plan = synthesize(&candidate, "tip", "$t", '"', Some(&dialect));
        assert_eq!(plan.text, ":title='$t(\"tip\")'");
    }

    #[test]
    fn test_vue_bound_attribute_keeps_prefix() {
        let text = "<template><i :title=\"'提示'\"></i></template>";
        let candidate = first_candidate(text, &[]);
        let dialect = Dialect::detect(Path::new("a.vue"), text);

        let plan = synthesize(&candidate, "tip", "t", '"', Some(&dialect));
        assert_eq!(plan.kind, PlanKind::Call);
        assert_eq!(
            apply(text, &plan),
            "<template><i :title=\"t('tip')\"></i></template>"
        );
    }

    #[test]
    fn test_jsx_attributes() {
        let text = "const A = () => <Button title=\"保存\" label={'取消'} />;";
        let dialect = Dialect::detect(Path::new("A.jsx"), text);
        let candidates = scan(text, &[]);

        let plain = synthesize(&candidates[0], "save", "t", '\'', Some(&dialect));
        assert_eq!(plain.text, "title={t('save')}");
        assert_eq!(plain.kind, PlanKind::AttributeBinding);

        let bound = synthesize(&candidates[1], "cancel", "t", '\'', Some(&dialect));
        assert_eq!(
            apply(text, &bound),
            "const A = () => <Button title=\"保存\" label={t('cancel')} />;"
        );
    }

    #[test]
    fn test_markup_text_is_interpolated() {
        let text = "<template>\n  <span> 正文 </span>\n</template>";
        let candidate = first_candidate(text, &[]);
        let dialect = Dialect::detect(Path::new("a.vue"), text);

        let plan = synthesize(&candidate, "body", "t", '\'', Some(&dialect));
        assert_eq!(plan.kind, PlanKind::Interpolation);
        assert_eq!(
            apply(text, &plan),
            "<template>\n  <span> {{ t('body') }} </span>\n</template>"
        );

        let jsx = "const A = () => <p>正文</p>;";
        let candidate = first_candidate(jsx, &[]);
        let dialect = Dialect::detect(Path::new("A.tsx"), jsx);
        let plan = synthesize(&candidate, "body", "t", '\'', Some(&dialect));
        assert_eq!(apply(jsx, &plan), "const A = () => <p>{t('body')}</p>;");
    }

    #[test]
    fn test_existing_interpolation_replaces_literal() {
        let text = "<template><p>{{ '欢迎' }}</p></template>";
        let candidate = first_candidate(text, &[]);
        let dialect = Dialect::detect(Path::new("a.vue"), text);

        let plan = synthesize(&candidate, "welcome", "t", '\'', Some(&dialect));
        assert_eq!(apply(text, &plan), "<template><p>{{ t('welcome') }}</p></template>");
    }

    #[test]
    fn test_script_literal_widens_over_quotes() {
        let text = "const o = { label: '远程开门' };";
        let candidate = first_candidate(text, &["label"]);
        let dialect = Dialect::detect(Path::new("a.ts"), text);

        let plan = synthesize(&candidate, "common.ok", "t", '\'', Some(&dialect));
        assert_eq!(apply(text, &plan), "const o = { label: t('common.ok') };");
    }

    #[test]
    fn test_fallback_without_probe() {
        let text = "const o = { label: '远程开门' };";
        let candidate = first_candidate(text, &["label"]);

        let plan = synthesize(&candidate, "common.ok", "i18n.t", '"', None);
        assert_eq!(plan.kind, PlanKind::Call);
        assert_eq!(apply(text, &plan), "const o = { label: i18n.t(\"common.ok\") };");
    }

    #[test]
    fn test_fallback_when_unclassifiable() {
        let text = "const a = '中文';";
        let candidate = first_candidate(text, &[]);
        // Probe built over a different buffer: the offset is out of range
        let dialect = Dialect::detect(Path::new("a.ts"), "x");

        let plan = synthesize(&candidate, "k", "t", '\'', Some(&dialect));
        assert_eq!(apply(text, &plan), "const a = t('k');");
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let text = "<template><b title=\"标题\">正文</b></template>";
        let dialect = Dialect::detect(Path::new("a.vue"), text);
        for candidate in scan(text, &[]) {
            let first = synthesize(&candidate, "k", "t", '\'', Some(&dialect));
            let second = synthesize(&candidate, "k", "t", '\'', Some(&dialect));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_base_offsets_line_up() {
        let text = "const a = '中文';";
        let candidate = crate::core::scanner::Scanner::new(
            &[],
            std::sync::Arc::new(crate::core::scanner::ScriptRange::cjk()),
        )
        .with_base(40)
        .scan(text)
        .remove(0);
        let dialect = Dialect::detect(Path::new("a.ts"), text).with_base(40);

        let plan = synthesize(&candidate, "k", "t", '\'', Some(&dialect));
        assert_eq!(plan.range, 40 + 10..40 + 18);
    }

    #[test]
    fn test_tsx_rewrite_leaves_code_alone() {
        let text = "const A = () => {\n  const [v] = useState<string>('默认');\n  return <div>你好</div>;\n};\nconst msg = '提示';\nconst B = () => <span>再见</span>;\n";
        let dialect = Dialect::detect(Path::new("A.tsx"), text);
        let plans: Vec<ReplacementPlan> = scan(text, &[])
            .iter()
            .map(|candidate| synthesize(candidate, "k", "t", '\'', Some(&dialect)))
            .collect();

        let edits = crate::core::edit::apply_plans(text, 0, &plans);
        assert_eq!(edits.skipped, 0);
        assert_eq!(
            edits.text,
            "const A = () => {\n  const [v] = useState<string>('默认');\n  return <div>{t('k')}</div>;\n};\nconst msg = t('k');\nconst B = () => <span>{t('k')}</span>;\n"
        );
    }
}
