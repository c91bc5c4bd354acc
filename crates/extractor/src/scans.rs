//! Lexical scans over raw component source.
//!
//! Each scan is independent and returns hits in source order. Nothing here
//! understands scopes or syntax trees: a construct that does not match a
//! pattern is simply absent from the result.

use once_cell::sync::Lazy;
use regex::Regex;
use signal_protocol::{is_identifier, Category, LayerDefinition, SignalRecord};
use std::collections::HashSet;

pub const SIGNALS_BINDING: &str = "signals";
pub const INPUT_SIGNAL_BINDING: &str = "inputSignal";

static LAYER_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*layer\(\s*["'`]([^"'`]*)["'`]\s*\)"#,
    )
    .expect("layer declaration pattern")
});

static LEASE_CALL: Lazy<Regex> = Lazy::new(|| two_arg_call("lease"));

static SPREAD_CALL: Lazy<Regex> = Lazy::new(|| two_arg_call("spread"));

static COMPOSITE_GUARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bsignals\.([A-Za-z][A-Za-z0-9]*)\s*&&\s*\(\s*\(\s*\)\s*=>")
        .expect("composite guard pattern")
});

static SIGNALS_REF: Lazy<Regex> = Lazy::new(|| reference_pattern(SIGNALS_BINDING));

static INPUT_SIGNAL_REF: Lazy<Regex> = Lazy::new(|| reference_pattern(INPUT_SIGNAL_BINDING));

static DOC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@signal[ \t]+([A-Za-z][A-Za-z0-9]*)[ \t]*(?:-[ \t]*)?([^\r\n*]*)")
        .expect("doc tag pattern")
});

static FUNCTION_PROPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunction\s+([A-Z][A-Za-z0-9]*)\s*\(\s*\{([^}]*)\}")
        .expect("function props pattern")
});

static ARROW_PROPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:const|let|var)\s+([A-Z][A-Za-z0-9]*)\s*(?::[^=]*)?=\s*(?:[A-Za-z_$][A-Za-z0-9_$.]*\(\s*)?\(\s*\{([^}]*)\}",
    )
    .expect("arrow props pattern")
});

static SIGNAL_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"//[ \t]*(?i:signals?)[ \t]*:[ \t]*([A-Za-z][A-Za-z0-9]*(?:[ \t]*,[ \t]*[A-Za-z][A-Za-z0-9]*)*)",
    )
    .expect("signal comment pattern")
});

static SIGNAL_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bsignals\s*[:=]\s*\[([^\]]*)\]").expect("signal array pattern")
});

static STRING_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'`]([A-Za-z][A-Za-z0-9]*)["'`]"#).expect("string item pattern")
});

/// `<callee>("<a>")` or `<callee>("<a>", "<b>")`
fn two_arg_call(callee: &str) -> Regex {
    Regex::new(&format!(
        r#"\b{callee}\(\s*["'`]([^"'`]*)["'`]\s*(?:,\s*["'`]([^"'`]*)["'`]\s*)?\)"#
    ))
    .expect("two-argument call pattern")
}

fn reference_pattern(binding: &str) -> Regex {
    Regex::new(&format!(
        r"\b{}\.([A-Za-z][A-Za-z0-9]*)",
        regex::escape(binding)
    ))
    .expect("reference pattern")
}

/// `const <Name> = layer("<Type>")` declarations, each with the signal ids
/// later passed through `<Name>(<any string>, "<id>")`.
pub fn scan_layers(source: &str) -> Vec<LayerDefinition> {
    let mut layers: Vec<LayerDefinition> = Vec::new();

    for caps in LAYER_DECL.captures_iter(source) {
        let name = &caps[1];
        if layers.iter().any(|layer| layer.layer_name == name) {
            continue;
        }
        let mut layer = LayerDefinition::new(name, &caps[2]);

        let member_call = format!(
            r#"(?:^|[^A-Za-z0-9_$.]){}\(\s*["'`][^"'`]*["'`]\s*,\s*["'`]([^"'`]*)["'`]"#,
            regex::escape(name)
        );
        let member_call = match Regex::new(&member_call) {
            Ok(re) => re,
            Err(err) => {
                log::warn!("Skipping layer {name}: {err}");
                continue;
            }
        };

        for member in member_call.captures_iter(source) {
            let id = &member[1];
            if is_identifier(id) && !layer.signals.iter().any(|s| s == id) {
                layer.signals.push(id.to_string());
            }
        }
        layers.push(layer);
    }

    layers
}

/// Flatten layer definitions into `Category::Layer` records
pub fn layer_records(layers: &[LayerDefinition]) -> Vec<SignalRecord> {
    layers
        .iter()
        .flat_map(|layer| {
            layer.signals.iter().map(move |id| {
                SignalRecord::new(
                    id,
                    format!("Layer signal ({}: {})", layer.layer_name, layer.layer_type),
                    Category::Layer,
                )
                .with_layer(&layer.layer_name)
            })
        })
        .collect()
}

/// `lease("<label>", "<key>")` contracts; the key is the signal, or the
/// label itself when no key is given
pub fn scan_leases(source: &str) -> Vec<SignalRecord> {
    scan_two_arg_calls(&LEASE_CALL, source, Category::Lease, "Lease contract")
}

/// `spread(...)` passthroughs, same argument rule as leases
pub fn scan_spreads(source: &str) -> Vec<SignalRecord> {
    scan_two_arg_calls(&SPREAD_CALL, source, Category::Spread, "Spread passthrough")
}

fn scan_two_arg_calls(
    pattern: &Regex,
    source: &str,
    category: Category,
    label: &str,
) -> Vec<SignalRecord> {
    pattern
        .captures_iter(source)
        .filter_map(|caps| {
            let first = caps.get(1)?.as_str();
            let id = caps.get(2).map_or(first, |m| m.as_str());
            if !is_identifier(id) {
                log::debug!("Ignoring {category} argument {id:?}: not an identifier");
                return None;
            }
            Some(SignalRecord::new(id, format!("{label}: {first}"), category))
        })
        .collect()
}

/// `signals.<name> && (() => ...)()`
pub fn scan_composites(source: &str) -> Vec<SignalRecord> {
    COMPOSITE_GUARD
        .captures_iter(source)
        .map(|caps| {
            let name = &caps[1];
            SignalRecord::new(name, format!("Composite signal: {name}"), Category::Composite)
        })
        .collect()
}

/// Every `<binding>.<name>` occurrence not on the denylist
pub fn scan_references(source: &str, binding: &str, denylist: &[String]) -> Vec<SignalRecord> {
    let custom;
    let pattern: &Regex = match binding {
        SIGNALS_BINDING => &*SIGNALS_REF,
        INPUT_SIGNAL_BINDING => &*INPUT_SIGNAL_REF,
        other => {
            custom = reference_pattern(other);
            &custom
        }
    };
    let description = if binding == SIGNALS_BINDING {
        "Signal"
    } else {
        "Input signal"
    };

    pattern
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .filter(|name| !is_denied(denylist, name))
        .map(|name| {
            let description = format!("{description}: {name}");
            SignalRecord::new(name, description, Category::Signal)
        })
        .collect()
}

/// `@signal <name> [- description]` docblock tags
pub fn scan_doc_tags(source: &str, denylist: &[String]) -> Vec<SignalRecord> {
    DOC_TAG
        .captures_iter(source)
        .filter(|caps| !is_denied(denylist, &caps[1]))
        .map(|caps| {
            let name = &caps[1];
            let text = caps[2].trim().trim_end_matches('/').trim();
            let description = if text.is_empty() {
                format!("Documented signal: {name}")
            } else {
                text.to_string()
            };
            SignalRecord::new(name, description, Category::Documented)
        })
        .collect()
}

/// Names destructured from a capitalized component's first parameter
pub fn scan_destructured_props(source: &str, denylist: &[String]) -> Vec<SignalRecord> {
    let mut out = Vec::new();
    for pattern in [&*FUNCTION_PROPS, &*ARROW_PROPS] {
        for caps in pattern.captures_iter(source) {
            let component = &caps[1];
            for part in caps[2].split(',') {
                let part = part.trim();
                if part.is_empty() || part.starts_with("...") {
                    continue;
                }
                let name = part
                    .split([':', '='])
                    .next()
                    .unwrap_or_default()
                    .trim();
                if !is_identifier(name) || is_denied(denylist, name) {
                    continue;
                }
                out.push(SignalRecord::new(
                    name,
                    format!("Prop of {component}"),
                    Category::Props,
                ));
            }
        }
    }
    out
}

/// `// signal: a` and `// signals: a, b` line comments
pub fn scan_signal_comments(source: &str, denylist: &[String]) -> Vec<SignalRecord> {
    SIGNAL_COMMENT
        .captures_iter(source)
        .flat_map(|caps| {
            caps[1]
                .split(',')
                .map(|name| name.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|name| is_identifier(name) && !is_denied(denylist, name))
        .map(|name| {
            let description = format!("Commented signal: {name}");
            SignalRecord::new(name, description, Category::Commented)
        })
        .collect()
}

/// String entries of `signals = [...]` or `signals: [...]`
pub fn scan_signal_definitions(source: &str, denylist: &[String]) -> Vec<SignalRecord> {
    SIGNAL_ARRAY
        .captures_iter(source)
        .flat_map(|caps| {
            let body = caps.get(1).map_or("", |m| m.as_str());
            STRING_ITEM
                .captures_iter(body)
                .map(|item| item[1].to_string())
                .collect::<Vec<_>>()
        })
        .filter(|name| !is_denied(denylist, name))
        .map(|name| {
            let description = format!("Defined signal: {name}");
            SignalRecord::new(name, description, Category::Defined)
        })
        .collect()
}

fn is_denied(denylist: &[String], name: &str) -> bool {
    denylist.iter().any(|denied| denied == name)
}

/// Accumulates records, first claim of a name wins
#[derive(Debug, Default)]
pub struct SignalSet {
    seen: HashSet<String>,
    records: Vec<SignalRecord>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the name was already claimed
    pub fn claim(&mut self, record: SignalRecord) -> bool {
        if self.seen.contains(&record.name) {
            return false;
        }
        self.seen.insert(record.name.clone());
        self.records.push(record);
        true
    }

    pub fn claim_all(&mut self, records: impl IntoIterator<Item = SignalRecord>) {
        for record in records {
            self.claim(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Grouped by category precedence, alphabetical within a group
    pub fn into_sorted(mut self) -> Vec<SignalRecord> {
        self.records.sort_by(|a, b| {
            a.category
                .precedence()
                .cmp(&b.category.precedence())
                .then_with(|| a.name.cmp(&b.name))
        });
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(records: &[SignalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn layer_declaration_collects_member_calls() {
        let source = r#"
            const Glow = layer("effect");
            const Tone = layer('tone');
            Glow("btn", "glow");
            Glow(`card`, 'shine');
            Tone("btn", "warm");
            Glow("btn", "glow");
        "#;
        let layers = scan_layers(source);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].layer_name, "Glow");
        assert_eq!(layers[0].layer_type, "effect");
        assert_eq!(layers[0].signals, vec!["glow", "shine"]);
        assert_eq!(layers[1].signals, vec!["warm"]);

        let records = layer_records(&layers);
        assert_eq!(records[0].layer.as_deref(), Some("Glow"));
        assert_eq!(records[0].description, "Layer signal (Glow: effect)");
    }

    #[test]
    fn layer_calls_do_not_match_longer_names() {
        let source = r#"
            const L = layer("x");
            BigL("btn", "nope");
            obj.L("btn", "nope2");
            L("btn", "yes");
        "#;
        let layers = scan_layers(source);
        assert_eq!(layers[0].signals, vec!["yes"]);
    }

    #[test]
    fn lease_uses_second_argument_when_present() {
        let records = scan_leases(r#"lease("label", "key"); lease("onlyOne"); lease("has space")"#);
        assert_eq!(names(&records), vec!["key", "onlyOne"]);
        assert_eq!(records[0].description, "Lease contract: label");
        assert!(records.iter().all(|r| r.category == Category::Lease));
    }

    #[test]
    fn spread_follows_lease_rule() {
        let records = scan_spreads(r#"spread('Forward tone', 'tone') spread("raw")"#);
        assert_eq!(names(&records), vec!["tone", "raw"]);
        assert!(records.iter().all(|r| r.category == Category::Spread));
    }

    #[test]
    fn composite_requires_inline_function_guard() {
        let source = r#"
            {signals.ripple && (() => (<span className="ripple" />))()}
            {signals.plain && <span />}
        "#;
        assert_eq!(names(&scan_composites(source)), vec!["ripple"]);
    }

    #[test]
    fn references_skip_denylist_and_other_bindings() {
        let denylist = vec!["className".to_string()];
        let source = "signals.primary signals.className mysignals.nope inputSignal.lg";
        let plain = scan_references(source, SIGNALS_BINDING, &denylist);
        assert_eq!(names(&plain), vec!["primary"]);

        let input = scan_references(source, INPUT_SIGNAL_BINDING, &denylist);
        assert_eq!(names(&input), vec!["lg"]);
        assert_eq!(input[0].description, "Input signal: lg");
    }

    #[test]
    fn doc_tags_keep_trailing_text() {
        let source = "/**\n * @signal glow - Soft outer glow\n * @signal pulse\n */";
        let records = scan_doc_tags(source, &[]);
        assert_eq!(names(&records), vec!["glow", "pulse"]);
        assert_eq!(records[0].description, "Soft outer glow");
        assert_eq!(records[1].description, "Documented signal: pulse");
    }

    #[test]
    fn destructured_props_from_function_and_arrow() {
        let denylist = vec!["children".to_string()];
        let source = r#"
            export function Card({ elevated, tone = "neutral", children, ...rest }) {}
            const Badge: FC<Props> = ({ pill, count: n }) => null;
            const Field = forwardRef(({ invalid }, ref) => null);
            function helper({ notAComponent }) {}
        "#;
        let records = scan_destructured_props(source, &denylist);
        assert_eq!(
            names(&records),
            vec!["elevated", "tone", "pill", "count", "invalid"]
        );
        assert_eq!(records[0].description, "Prop of Card");
    }

    #[test]
    fn comments_and_definitions() {
        let source = r#"
            // signal: glow
            // Signals: pulse, spin
            export const signals = ["primary", 'lg', "2xl"];
        "#;
        assert_eq!(
            names(&scan_signal_comments(source, &[])),
            vec!["glow", "pulse", "spin"]
        );
        assert_eq!(
            names(&scan_signal_definitions(source, &[])),
            vec!["primary", "lg"]
        );
    }

    #[test]
    fn signal_set_first_claim_wins_and_sorts_by_group() {
        let mut set = SignalSet::new();
        assert!(set.claim(SignalRecord::new("zeta", "", Category::Lease)));
        assert!(set.claim(SignalRecord::new("alpha", "", Category::Signal)));
        assert!(set.claim(SignalRecord::new("beta", "", Category::Layer)));
        assert!(!set.claim(SignalRecord::new("zeta", "", Category::Signal)));
        assert_eq!(set.len(), 3);

        let sorted = set.into_sorted();
        assert_eq!(names(&sorted), vec!["beta", "zeta", "alpha"]);
        assert_eq!(sorted[1].category, Category::Lease);
    }
}
