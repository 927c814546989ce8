use crate::core::registry::Registry;
use crate::core::rules::{ArgSpec, Rule};

pub const FAMILY_NAME: &str = "sapt";

/// Below this first-order exchange magnitude the exchange scaling factor is pinned to 1.
pub const EXCHSCAL_NUMERATOR_THRESHOLD: f64 = 1.0e-5;

/// Spin-component-scaling coefficients for the same-spin and opposite-spin SAPT0 dispersion.
pub const SCS_SAME_SPIN_SCALE: f64 = 0.66;
pub const SCS_OPPOSITE_SPIN_SCALE: f64 = 1.2;

fn exchange_scaling(x: &[f64]) -> f64 {
    if x[0] < EXCHSCAL_NUMERATOR_THRESHOLD {
        1.0
    } else {
        x[0] / x[1]
    }
}

fn cube(x: &[f64]) -> f64 {
    x[0].powf(3.0)
}

fn hf2_unscaled(x: &[f64]) -> f64 {
    x[0] - (x[1] + x[2] + x[3] + x[4])
}

fn hf2_scaled(x: &[f64]) -> f64 {
    x[1] + (1.0 - x[0]) * x[2]
}

/// `x[1] - (x[2] + s * x[3])` with `s = x[0]`; shared by the HF(3) and MP2(3) deltas.
fn third_order_delta(x: &[f64]) -> f64 {
    x[1] - (x[2] + x[0] * x[3])
}

fn mp2_second_order_delta(x: &[f64]) -> f64 {
    x[1] - (x[2] + x[3] + x[4] + x[0] * (x[5] + x[6] + x[7] + x[8]))
}

fn mp4_dispersion(x: &[f64]) -> f64 {
    x[0] * x[1] + x[2] + x[3] + x[4] + x[5]
}

fn ccd_dispersion(x: &[f64]) -> f64 {
    x[0] * x[1] + x[2] + x[3] + x[4]
}

fn scaled_first_plus(x: &[f64]) -> f64 {
    x[0] * x[1] + x[2]
}

fn sapt0_induction(x: &[f64]) -> f64 {
    x[1] + x[2] + x[0] * x[3]
}

fn ssapt0_induction(x: &[f64]) -> f64 {
    x[1] + (x[0] - 1.0) * x[2]
}

fn scs_dispersion(x: &[f64]) -> f64 {
    x[0] * (x[1] + x[2]) + x[3] * (x[4] + x[5])
}

fn scaled_exchange(x: &[f64]) -> f64 {
    x[1] + x[0] * (x[2] + x[3])
}

/// `x[1] + x[2] + s*x[3] + x[4] + s*x[5]`: second-order induction and third-order dispersion.
fn scaled_pair_sum(x: &[f64]) -> f64 {
    x[1] + x[2] + x[0] * x[3] + x[4] + x[0] * x[5]
}

fn sapt2p3_induction(x: &[f64]) -> f64 {
    x[1] + x[2] + x[0] * x[3] + x[4] + x[0] * x[5] + x[6] + x[0] * x[7]
}

fn components(prefix: &str) -> [String; 4] {
    ["ELST", "EXCH", "INDC", "DISP"].map(|c| format!("{} {} ENERGY", prefix, c))
}

fn total(prefix: &str) -> (String, Rule) {
    (format!("{} TOTAL ENERGY", prefix), Rule::sum(components(prefix)))
}

fn alias(name: &str, target: &str) -> (String, Rule) {
    (name.to_string(), Rule::sum([target]))
}

/// Derived SAPT interaction-energy variables, keyed by their canonical names.
///
/// Every rule bottoms out in quantities reported directly by a SAPT calculation
/// (e.g. `SAPT ELST10,R ENERGY`, `SAPT EXCH10 ENERGY`). Shared intermediates such as
/// `SAPT EXCHSCAL`, `SAPT HF(2) ENERGY` and `SAPT MP4 DISP` are themselves registered here.
pub fn sapt_psivars() -> Registry {
    let mut rules: Vec<(String, Rule)> = vec![
        (
            "SAPT EXCHSCAL".into(),
            Rule::formula(
                2,
                exchange_scaling,
                ["SAPT EXCH10 ENERGY", "SAPT EXCH10(S^2) ENERGY"],
            ),
        ),
        (
            "SAPT EXCHSCAL3".into(),
            Rule::formula(1, cube, ["SAPT EXCHSCAL"]),
        ),
        (
            "SAPT HF(2) ALPHA=0.0 ENERGY".into(),
            Rule::formula(
                5,
                hf2_unscaled,
                [
                    "SAPT HF TOTAL ENERGY",
                    "SAPT ELST10,R ENERGY",
                    "SAPT EXCH10 ENERGY",
                    "SAPT IND20,R ENERGY",
                    "SAPT EXCH-IND20,R ENERGY",
                ],
            ),
        ),
        (
            "SAPT HF(2) ENERGY".into(),
            Rule::formula(
                3,
                hf2_scaled,
                [
                    "SAPT EXCHSCAL",
                    "SAPT HF(2) ALPHA=0.0 ENERGY",
                    "SAPT EXCH-IND20,R ENERGY",
                ],
            ),
        ),
        (
            "SAPT HF(3) ENERGY".into(),
            Rule::formula(
                4,
                third_order_delta,
                [
                    "SAPT EXCHSCAL",
                    "SAPT HF(2) ENERGY",
                    "SAPT IND30,R ENERGY",
                    "SAPT EXCH-IND30,R ENERGY",
                ],
            ),
        ),
        (
            // The correlation energy is the interaction-level SA MP2 value.
            "SAPT MP2(2) ENERGY".into(),
            Rule::formula(
                9,
                mp2_second_order_delta,
                [
                    "SAPT EXCHSCAL",
                    "SA MP2 CORRELATION ENERGY",
                    "SAPT ELST12,R ENERGY",
                    "SAPT IND22 ENERGY",
                    "SAPT DISP20 ENERGY",
                    "SAPT EXCH11(S^2) ENERGY",
                    "SAPT EXCH12(S^2) ENERGY",
                    "SAPT EXCH-IND22 ENERGY",
                    "SAPT EXCH-DISP20 ENERGY",
                ],
            ),
        ),
        (
            "SAPT MP2(3) ENERGY".into(),
            Rule::formula(
                4,
                third_order_delta,
                [
                    "SAPT EXCHSCAL",
                    "SAPT MP2(2) ENERGY",
                    "SAPT IND-DISP30 ENERGY",
                    "SAPT EXCH-IND-DISP30 ENERGY",
                ],
            ),
        ),
        (
            "SAPT MP4 DISP".into(),
            Rule::formula(
                6,
                mp4_dispersion,
                [
                    "SAPT EXCHSCAL",
                    "SAPT EXCH-DISP20 ENERGY",
                    "SAPT DISP20 ENERGY",
                    "SAPT DISP21 ENERGY",
                    "SAPT DISP22(SDQ) ENERGY",
                    "SAPT EST.DISP22(T) ENERGY",
                ],
            ),
        ),
        (
            "SAPT CCD DISP".into(),
            Rule::formula(
                5,
                ccd_dispersion,
                [
                    "SAPT EXCHSCAL",
                    "SAPT EXCH-DISP20 ENERGY",
                    "SAPT DISP2(CCD) ENERGY",
                    "SAPT DISP22(S)(CCD) ENERGY",
                    "SAPT EST.DISP22(T)(CCD) ENERGY",
                ],
            ),
        ),
    ];

    // SAPT0
    rules.extend([
        alias("SAPT0 ELST ENERGY", "SAPT ELST10,R ENERGY"),
        alias("SAPT0 EXCH ENERGY", "SAPT EXCH10 ENERGY"),
        (
            "SAPT0 INDC ENERGY".into(),
            Rule::formula(
                4,
                sapt0_induction,
                [
                    "SAPT EXCHSCAL",
                    "SAPT HF(2) ENERGY",
                    "SAPT IND20,R ENERGY",
                    "SAPT EXCH-IND20,R ENERGY",
                ],
            ),
        ),
        (
            "SAPT0 DISP ENERGY".into(),
            Rule::formula(
                3,
                scaled_first_plus,
                [
                    "SAPT EXCHSCAL",
                    "SAPT EXCH-DISP20 ENERGY",
                    "SAPT DISP20 ENERGY",
                ],
            ),
        ),
        total("SAPT0"),
    ]);

    // sSAPT0: induction and dispersion rescaled by the cubed exchange scaling factor.
    rules.extend([
        alias("SSAPT0 ELST ENERGY", "SAPT0 ELST ENERGY"),
        alias("SSAPT0 EXCH ENERGY", "SAPT0 EXCH ENERGY"),
        (
            "SSAPT0 INDC ENERGY".into(),
            Rule::formula(
                3,
                ssapt0_induction,
                [
                    "SAPT EXCHSCAL3",
                    "SAPT0 INDC ENERGY",
                    "SAPT EXCH-IND20,R ENERGY",
                ],
            ),
        ),
        (
            "SSAPT0 DISP ENERGY".into(),
            Rule::formula(
                3,
                scaled_first_plus,
                [
                    "SAPT EXCHSCAL3",
                    "SAPT EXCH-DISP20 ENERGY",
                    "SAPT DISP20 ENERGY",
                ],
            ),
        ),
        total("SSAPT0"),
    ]);

    // SCS-SAPT0: the dispersion term carries no exchange scaling.
    rules.extend([
        alias("SCS-SAPT0 ELST ENERGY", "SAPT0 ELST ENERGY"),
        alias("SCS-SAPT0 EXCH ENERGY", "SAPT0 EXCH ENERGY"),
        alias("SCS-SAPT0 INDC ENERGY", "SAPT0 INDC ENERGY"),
        (
            "SCS-SAPT0 DISP ENERGY".into(),
            Rule::formula(
                6,
                scs_dispersion,
                [
                    ArgSpec::literal(SCS_SAME_SPIN_SCALE),
                    ArgSpec::reference("SAPT EXCH-DISP20(SS) ENERGY"),
                    ArgSpec::reference("SAPT DISP20(SS) ENERGY"),
                    ArgSpec::literal(SCS_OPPOSITE_SPIN_SCALE),
                    ArgSpec::reference("SAPT EXCH-DISP20(OS) ENERGY"),
                    ArgSpec::reference("SAPT DISP20(OS) ENERGY"),
                ],
            ),
        ),
        total("SCS-SAPT0"),
    ]);

    // SAPT2 and SAPT2+ share electrostatics, exchange and induction.
    for prefix in ["SAPT2", "SAPT2+"] {
        rules.extend([
            (
                format!("{} ELST ENERGY", prefix),
                Rule::sum(["SAPT ELST10,R ENERGY", "SAPT ELST12,R ENERGY"]),
            ),
            (format!("{} EXCH ENERGY", prefix), second_order_exchange()),
            (format!("{} INDC ENERGY", prefix), second_order_induction()),
        ]);
        if prefix == "SAPT2" {
            rules.push((
                "SAPT2 DISP ENERGY".into(),
                Rule::formula(
                    3,
                    scaled_first_plus,
                    [
                        "SAPT EXCHSCAL",
                        "SAPT EXCH-DISP20 ENERGY",
                        "SAPT DISP20 ENERGY",
                    ],
                ),
            ));
        } else {
            rules.push(alias("SAPT2+ DISP ENERGY", "SAPT MP4 DISP"));
        }
        rules.push(total(prefix));
    }

    rules.extend(reuse_components(
        "SAPT2+(CCD)",
        "SAPT2+",
        Rule::sum(["SAPT CCD DISP"]),
    ));
    rules.extend(dmp2_variants("SAPT2+", "SAPT MP2(2) ENERGY"));

    // SAPT2+(3)
    rules.extend([
        ("SAPT2+(3) ELST ENERGY".into(), third_order_electrostatics()),
        ("SAPT2+(3) EXCH ENERGY".into(), second_order_exchange()),
        ("SAPT2+(3) INDC ENERGY".into(), second_order_induction()),
        (
            "SAPT2+(3) DISP ENERGY".into(),
            Rule::sum(["SAPT MP4 DISP", "SAPT DISP30 ENERGY"]),
        ),
        total("SAPT2+(3)"),
    ]);
    rules.extend(reuse_components(
        "SAPT2+(3)(CCD)",
        "SAPT2+(3)",
        Rule::sum(["SAPT CCD DISP", "SAPT DISP30 ENERGY"]),
    ));
    rules.extend(dmp2_variants("SAPT2+(3)", "SAPT MP2(2) ENERGY"));

    // SAPT2+3
    rules.extend([
        ("SAPT2+3 ELST ENERGY".into(), third_order_electrostatics()),
        ("SAPT2+3 EXCH ENERGY".into(), second_order_exchange()),
        (
            "SAPT2+3 INDC ENERGY".into(),
            Rule::formula(
                8,
                sapt2p3_induction,
                [
                    "SAPT EXCHSCAL",
                    "SAPT HF(3) ENERGY",
                    "SAPT IND20,R ENERGY",
                    "SAPT EXCH-IND20,R ENERGY",
                    "SAPT IND22 ENERGY",
                    "SAPT EXCH-IND22 ENERGY",
                    "SAPT IND30,R ENERGY",
                    "SAPT EXCH-IND30,R ENERGY",
                ],
            ),
        ),
        (
            "SAPT2+3 DISP ENERGY".into(),
            third_order_dispersion("SAPT MP4 DISP"),
        ),
        total("SAPT2+3"),
    ]);
    rules.extend(reuse_components(
        "SAPT2+3(CCD)",
        "SAPT2+3",
        third_order_dispersion("SAPT CCD DISP"),
    ));
    rules.extend(dmp2_variants("SAPT2+3", "SAPT MP2(3) ENERGY"));

    Registry::from_rules(FAMILY_NAME, rules)
}

fn third_order_electrostatics() -> Rule {
    Rule::sum([
        "SAPT ELST10,R ENERGY",
        "SAPT ELST12,R ENERGY",
        "SAPT ELST13,R ENERGY",
    ])
}

fn second_order_exchange() -> Rule {
    Rule::formula(
        4,
        scaled_exchange,
        [
            "SAPT EXCHSCAL",
            "SAPT EXCH10 ENERGY",
            "SAPT EXCH11(S^2) ENERGY",
            "SAPT EXCH12(S^2) ENERGY",
        ],
    )
}

fn second_order_induction() -> Rule {
    Rule::formula(
        6,
        scaled_pair_sum,
        [
            "SAPT EXCHSCAL",
            "SAPT HF(2) ENERGY",
            "SAPT IND20,R ENERGY",
            "SAPT EXCH-IND20,R ENERGY",
            "SAPT IND22 ENERGY",
            "SAPT EXCH-IND22 ENERGY",
        ],
    )
}

fn third_order_dispersion(second_order: &str) -> Rule {
    Rule::formula(
        6,
        scaled_pair_sum,
        [
            "SAPT EXCHSCAL",
            second_order,
            "SAPT DISP30 ENERGY",
            "SAPT EXCH-DISP30 ENERGY",
            "SAPT IND-DISP30 ENERGY",
            "SAPT EXCH-IND-DISP30 ENERGY",
        ],
    )
}

/// A level that borrows ELST/EXCH/INDC from `base` and defines its own dispersion.
fn reuse_components(level: &str, base: &str, dispersion: Rule) -> Vec<(String, Rule)> {
    let [elst, exch, indc, _] = components(base);
    vec![
        alias(&format!("{} ELST ENERGY", level), &elst),
        alias(&format!("{} EXCH ENERGY", level), &exch),
        alias(&format!("{} INDC ENERGY", level), &indc),
        (format!("{} DISP ENERGY", level), dispersion),
        total(level),
    ]
}

/// The `dMP2` level and its `(CCD)dMP2` companion, both folding `mp2_delta` into induction.
fn dmp2_variants(base: &str, mp2_delta: &str) -> Vec<(String, Rule)> {
    let [elst, exch, indc, disp] = components(base);
    let dmp2 = format!("{}DMP2", base);
    let ccd_dmp2 = format!("{}(CCD)DMP2", base);
    let [dmp2_elst, dmp2_exch, dmp2_indc, dmp2_disp] = components(&dmp2);
    let [ccd_elst, ccd_exch, ccd_indc, ccd_disp] = components(&ccd_dmp2);

    vec![
        (dmp2_elst, Rule::sum([elst.as_str()])),
        (dmp2_exch, Rule::sum([exch.as_str()])),
        (dmp2_indc.clone(), Rule::sum([indc.as_str(), mp2_delta])),
        (dmp2_disp, Rule::sum([disp.as_str()])),
        total(&dmp2),
        (ccd_elst, Rule::sum([elst.as_str()])),
        (ccd_exch, Rule::sum([exch.as_str()])),
        (ccd_indc, Rule::sum([dmp2_indc.as_str()])),
        (
            ccd_disp,
            Rule::sum([format!("{}(CCD) DISP ENERGY", base)]),
        ),
        total(&ccd_dmp2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::ReduceOp;
    use crate::core::rules::combinator::Combinator;

    fn refs(registry: &Registry, name: &str) -> Vec<String> {
        registry
            .lookup(name)
            .unwrap()
            .references()
            .map(str::to_string)
            .collect()
    }

    fn apply(registry: &Registry, name: &str, values: &[f64]) -> f64 {
        registry
            .lookup(name)
            .unwrap()
            .combinator()
            .apply(values)
            .unwrap()
    }

    #[test]
    fn registry_defines_the_full_family() {
        let registry = sapt_psivars();
        assert_eq!(registry.len(), 89);
        assert_eq!(registry.families(), &[FAMILY_NAME.to_string()]);
    }

    #[test]
    fn declaration_order_starts_with_shared_intermediates() {
        let registry = sapt_psivars();
        let names: Vec<_> = registry.names().take(3).collect();
        assert_eq!(
            names,
            vec![
                "SAPT EXCHSCAL",
                "SAPT EXCHSCAL3",
                "SAPT HF(2) ALPHA=0.0 ENERGY"
            ]
        );
        assert_eq!(
            registry.names().last(),
            Some("SAPT2+3(CCD)DMP2 TOTAL ENERGY")
        );
    }

    #[test]
    fn every_formula_declares_matching_arity() {
        let registry = sapt_psivars();
        for (name, rule) in registry.iter() {
            if let Some(arity) = rule.combinator().arity() {
                assert_eq!(
                    arity,
                    rule.arguments().len(),
                    "arity mismatch in rule for {}",
                    name
                );
            }
        }
    }

    #[test]
    fn exchange_scaling_uses_ratio_above_threshold() {
        let registry = sapt_psivars();
        assert_eq!(
            apply(&registry, "SAPT EXCHSCAL", &[0.02, 0.018]),
            0.02 / 0.018
        );
    }

    #[test]
    fn exchange_scaling_is_one_below_threshold() {
        let registry = sapt_psivars();
        assert_eq!(apply(&registry, "SAPT EXCHSCAL", &[1e-7, 0.018]), 1.0);
        assert_eq!(apply(&registry, "SAPT EXCHSCAL", &[-0.5, 0.018]), 1.0);
    }

    #[test]
    fn scs_dispersion_interleaves_literals_with_references() {
        let registry = sapt_psivars();
        let rule = registry.lookup("SCS-SAPT0 DISP ENERGY").unwrap();
        assert_eq!(rule.arguments()[0], ArgSpec::Literal(0.66));
        assert_eq!(rule.arguments()[3], ArgSpec::Literal(1.2));
        assert_eq!(
            refs(&registry, "SCS-SAPT0 DISP ENERGY"),
            vec![
                "SAPT EXCH-DISP20(SS) ENERGY",
                "SAPT DISP20(SS) ENERGY",
                "SAPT EXCH-DISP20(OS) ENERGY",
                "SAPT DISP20(OS) ENERGY",
            ]
        );
        assert_eq!(
            apply(
                &registry,
                "SCS-SAPT0 DISP ENERGY",
                &[0.66, 1.0, 2.0, 1.2, 3.0, 4.0]
            ),
            0.66 * (1.0 + 2.0) + 1.2 * (3.0 + 4.0)
        );
    }

    #[test]
    fn totals_sum_their_four_components_in_order() {
        let registry = sapt_psivars();
        let rule = registry.lookup("SAPT2+(3)(CCD)DMP2 TOTAL ENERGY").unwrap();
        assert!(matches!(
            rule.combinator(),
            Combinator::Reduce(ReduceOp::Sum)
        ));
        assert_eq!(
            refs(&registry, "SAPT2+(3)(CCD)DMP2 TOTAL ENERGY"),
            vec![
                "SAPT2+(3)(CCD)DMP2 ELST ENERGY",
                "SAPT2+(3)(CCD)DMP2 EXCH ENERGY",
                "SAPT2+(3)(CCD)DMP2 INDC ENERGY",
                "SAPT2+(3)(CCD)DMP2 DISP ENERGY",
            ]
        );
    }

    #[test]
    fn dmp2_levels_fold_the_matching_mp2_delta_into_induction() {
        let registry = sapt_psivars();
        assert_eq!(
            refs(&registry, "SAPT2+DMP2 INDC ENERGY"),
            vec!["SAPT2+ INDC ENERGY", "SAPT MP2(2) ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+(3)DMP2 INDC ENERGY"),
            vec!["SAPT2+(3) INDC ENERGY", "SAPT MP2(2) ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+3DMP2 INDC ENERGY"),
            vec!["SAPT2+3 INDC ENERGY", "SAPT MP2(3) ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+3(CCD)DMP2 INDC ENERGY"),
            vec!["SAPT2+3DMP2 INDC ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+3(CCD)DMP2 DISP ENERGY"),
            vec!["SAPT2+3(CCD) DISP ENERGY"]
        );
    }

    #[test]
    fn ccd_levels_reuse_parent_components() {
        let registry = sapt_psivars();
        assert_eq!(
            refs(&registry, "SAPT2+(CCD) EXCH ENERGY"),
            vec!["SAPT2+ EXCH ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+(3)(CCD) DISP ENERGY"),
            vec!["SAPT CCD DISP", "SAPT DISP30 ENERGY"]
        );
        assert_eq!(
            refs(&registry, "SAPT2+3(CCD) DISP ENERGY")[1],
            "SAPT CCD DISP"
        );
    }

    #[test]
    fn near_identical_names_are_distinct_entries() {
        let registry = sapt_psivars();
        assert!(registry.contains("SAPT2+(3)(CCD)DMP2 TOTAL ENERGY"));
        assert!(registry.contains("SAPT2+(3)(CCD) TOTAL ENERGY"));
        assert_ne!(
            refs(&registry, "SAPT2+(3)(CCD)DMP2 TOTAL ENERGY"),
            refs(&registry, "SAPT2+(3)(CCD) TOTAL ENERGY")
        );
    }

    #[test]
    fn exchange_scaling_cube_matches_pow() {
        let registry = sapt_psivars();
        assert_eq!(apply(&registry, "SAPT EXCHSCAL3", &[1.1]), 1.1_f64.powf(3.0));
    }

    #[test]
    fn hf2_formulas_follow_positional_semantics() {
        let registry = sapt_psivars();
        assert_eq!(
            apply(
                &registry,
                "SAPT HF(2) ALPHA=0.0 ENERGY",
                &[10.0, 1.0, 2.0, 3.0, 0.5]
            ),
            10.0 - (1.0 + 2.0 + 3.0 + 0.5)
        );
        assert_eq!(
            apply(&registry, "SAPT HF(2) ENERGY", &[1.5, 2.0, 4.0]),
            2.0 + (1.0 - 1.5) * 4.0
        );
    }
}
