use std::cell::RefCell;

use nalgebra::{DMatrix, DVector};
use paste::paste;

use crate::{
    elements::SymbolTable,
    events::{Event, EventSink},
    formula::{Element, Role, Span},
    matrix::LinearSystem,
    parser::{self, find_yield, parse_reaction, read_reactions},
    reaction::{self, assemble, balance, Balancer, Options, Reaction},
    report::{self, Report},
    simplify::{self, gcd, simplify, Fraction, RationalTable},
    solver::{self, EliminationSolver, FallbackReason, InverseSolver, Method, Solver},
};

/// Asserts that every element has as many atoms on both sides.
fn assert_conserved(reaction: &Reaction) {
    for symbol in reaction.unique_elements() {
        let mut balance = 0i128;
        for (compound, &coefficient) in reaction.compounds().iter().zip(reaction.coefficients()) {
            let atoms = (compound.atoms_of(symbol) * coefficient) as i128;
            match compound.role() {
                Role::Reactant => balance += atoms,
                Role::Product => balance -= atoms,
            }
        }
        assert_eq!(
            balance,
            0,
            "{} is not conserved in '{}'",
            symbol,
            reaction.balanced_formula()
        );
    }
}

fn assert_minimal(coefficients: &[u64]) {
    assert!(coefficients.iter().all(|&c| c >= 1));
    assert_eq!(coefficients.iter().copied().fold(0, gcd), 1);
}

fn balance_with<T: Solver>(formula: &str) -> Result<Reaction, reaction::Error> {
    Balancer::<T>::new(Options::default())
        .with_sink(())
        .balance(formula)
}

macro_rules! balanced_testcase_with_solver {
    ($solver:ident, $name:ident, $formula:expr, [$($coefficient:expr),*]) => {
        paste! {
            #[test]
            fn [< $solver:snake _ $name >]() {
                let expected: &[u64] = &[$($coefficient),*];
                let reaction = balance_with::<$solver>($formula).unwrap();
                assert_eq!(reaction.coefficients(), expected);
                assert_conserved(&reaction);
                assert_minimal(reaction.coefficients());
            }
        }
    };
}

macro_rules! rejected_testcase_with_solver {
    ($solver:ident, $name:ident, $formula:expr, $pattern:pat) => {
        paste! {
            #[test]
            fn [< $solver:snake _ $name >]() {
                let error = balance_with::<$solver>($formula).unwrap_err();
                assert!(matches!(error, $pattern), "unexpected error: {:?}", error);
            }
        }
    };
}

macro_rules! balanced_testcase {
    ($name:ident, $formula:expr, $coefficients:tt) => {
        balanced_testcase_with_solver!(InverseSolver, $name, $formula, $coefficients);
        balanced_testcase_with_solver!(EliminationSolver, $name, $formula, $coefficients);
    };
}

macro_rules! rejected_testcase {
    ($name:ident, $formula:expr, $pattern:pat) => {
        rejected_testcase_with_solver!(InverseSolver, $name, $formula, $pattern);
        rejected_testcase_with_solver!(EliminationSolver, $name, $formula, $pattern);
    };
}

// square, regular systems
balanced_testcase!(chromium_oxide, "Cr + O2 = Cr2O3", [4, 3, 2]);
balanced_testcase!(water, "H2 + O2 = H2O", [2, 1, 2]);
balanced_testcase!(already_balanced, "N2 = N2", [1, 1]);
balanced_testcase!(propane, "C3H8 + O2 = CO2 + H2O", [1, 5, 3, 4]);
balanced_testcase!(methane, "CH4 + O2 = CO2 + H2O", [1, 2, 1, 2]);
balanced_testcase!(iron_oxide_reduction, "Fe2O3 + CO = Fe + CO2", [1, 3, 2, 3]);
balanced_testcase!(zinc_chloride, "Zn + HCl = ZnCl2 + H2", [1, 2, 1, 1]);
balanced_testcase!(phosphorus_pentoxide, "P4 + O2 = P2O5", [1, 5, 2]);
balanced_testcase!(glucose, "C6H12O6 + O2 = CO2 + H2O", [1, 6, 6, 6]);
balanced_testcase!(acetic_acid, "CH3COOH + O2 = CO2 + H2O", [1, 2, 2, 2]);

// yield symbols
balanced_testcase!(arrow, "H2 + O2 -> H2O", [2, 1, 2]);
balanced_testcase!(long_arrow, "H2 + O2 --> H2O", [2, 1, 2]);
balanced_testcase!(equilibrium_arrow, "H2 + O2 <--> H2O", [2, 1, 2]);

// non-square and singular systems
balanced_testcase!(sodium_bicarbonate, "NaHCO3 = Na2CO3 + CO2 + H2O", [2, 1, 1, 1]);
balanced_testcase!(potassium_chlorate, "KClO3 = KCl + O2", [2, 2, 3]);

// existing coefficients are ignored
balanced_testcase!(rebalance, "4Cr + 3O2 = 2Cr2O3", [4, 3, 2]);
balanced_testcase!(wrong_coefficients, "2H2 + 2O2 = 5H2O", [2, 1, 2]);

rejected_testcase!(
    no_yield_symbol,
    "H2 O2 H2O",
    reaction::Error::ParseError {
        source: parser::Error::MalformedReaction { .. }
    }
);
rejected_testcase!(
    parenthesized_group,
    "Fe + AgNO3 = Fe(NO3)2 + Ag",
    reaction::Error::ParseError {
        source: parser::Error::MalformedFormula { .. }
    }
);
rejected_testcase!(
    impossible_balance,
    "H2 = O2",
    reaction::Error::SolveError {
        source: solver::Error::UnsolvableSystem { .. },
        ..
    }
);
rejected_testcase!(
    subscript_out_of_range,
    "H99999999999 = H",
    reaction::Error::ParseError {
        source: parser::Error::MalformedFormula { .. }
    }
);
rejected_testcase!(
    two_independent_reactions,
    "H2 + O2 = H2O + H2O2",
    reaction::Error::SolveError {
        source: solver::Error::UnsolvableSystem { .. },
        ..
    }
);
rejected_testcase!(
    carbon_monoxide_family,
    "CO + O2 = CO2 + C",
    reaction::Error::SolveError {
        source: solver::Error::UnsolvableSystem { .. },
        ..
    }
);
rejected_testcase!(
    dependent_elements,
    "Na2Cl2 + NaCl = Na3Cl3",
    reaction::Error::SolveError {
        source: solver::Error::UnsolvableSystem { .. },
        ..
    }
);
rejected_testcase!(
    coefficient_out_of_table,
    "C25H52 + O2 = CO2 + H2O",
    reaction::Error::SimplifyError {
        source: simplify::Error::UnrepresentableCoefficient { .. },
        ..
    }
);

#[test]
fn scenario_chromium_oxide() {
    let reaction = balance("Cr + O2 = Cr2O3").unwrap();

    assert_eq!(reaction.unbalanced_formula(), "Cr + O2 = Cr2O3");
    assert_eq!(reaction.unique_elements(), &["Cr", "O"]);
    assert_eq!(reaction.reactants(), &["Cr", "O2"]);
    assert_eq!(reaction.products(), &["Cr2O3"]);
    assert_eq!(reaction.coefficients(), &[4u64, 3, 2][..]);
    assert_eq!(reaction.balanced_formula(), "4Cr + 3O2 = 2Cr2O3");
    assert_eq!(reaction.method(), Method::Inverse);

    let coefficients: Vec<_> = reaction
        .compounds()
        .iter()
        .map(|compound| compound.coefficient())
        .collect();
    assert_eq!(coefficients, vec![Some(4), Some(3), Some(2)]);
}

#[test]
fn coefficient_one_is_written_out() {
    let reaction = balance("CH4 + O2 = CO2 + H2O").unwrap();
    assert_eq!(reaction.balanced_formula(), "1CH4 + 2O2 = 1CO2 + 2H2O");
}

#[test]
fn larger_table_limit() {
    let reaction = Balancer::<InverseSolver>::new(Options {
        table_limit: 60,
        ..Options::default()
    })
    .balance("C25H52 + O2 = CO2 + H2O")
    .unwrap();

    assert_eq!(reaction.coefficients(), &[1u64, 38, 25, 26][..]);
    assert_conserved(&reaction);
}

#[test]
fn determinism() {
    let formula = "NaHCO3 = Na2CO3 + CO2 + H2O";
    let first = balance(formula).unwrap();
    let second = balance(formula).unwrap();

    assert_eq!(first.unique_elements(), second.unique_elements());
    assert_eq!(first.reactants(), second.reactants());
    assert_eq!(first.products(), second.products());
    assert_eq!(first.coefficients(), second.coefficients());
    assert_eq!(first.balanced_formula(), second.balanced_formula());
    assert_eq!(first.unique_elements(), &["Na", "H", "C", "O"]);
}

#[test]
fn round_trip() {
    for formula in read_reactions("testcases/reactions.txt").unwrap() {
        let reaction = balance(&formula).unwrap();
        let again = balance(reaction.balanced_formula()).unwrap();

        assert_eq!(reaction.coefficients(), again.coefficients());
        assert_eq!(reaction.balanced_formula(), again.balanced_formula());
    }
}

#[test]
fn reaction_file() {
    let formulas = read_reactions("testcases/reactions.txt").unwrap();
    assert_eq!(formulas.len(), 13);
    assert!(formulas.iter().all(|formula| !formula.starts_with('#')));

    for formula in &formulas {
        for reaction in vec![
            balance_with::<InverseSolver>(formula).unwrap(),
            balance_with::<EliminationSolver>(formula).unwrap(),
        ] {
            assert_conserved(&reaction);
            assert_minimal(reaction.coefficients());
        }
    }
}

#[test]
fn missing_reaction_file() {
    let error = read_reactions("testcases/does_not_exist.txt").unwrap_err();
    assert!(matches!(error, parser::Error::IoError { .. }));
}

#[test]
fn solvers_agree() {
    for formula in read_reactions("testcases/reactions.txt").unwrap() {
        let inverse = balance_with::<InverseSolver>(&formula).unwrap();
        let elimination = balance_with::<EliminationSolver>(&formula).unwrap();
        assert_eq!(inverse.coefficients(), elimination.coefficients());
    }
}

#[test]
fn parse_compounds_and_roles() {
    let equation = parse_reaction("Cr + O2 = Cr2O3").unwrap();

    assert_eq!(equation.yield_span(), Span::new(8, 9));
    assert_eq!(equation.num_reactants(), 2);
    assert_eq!(equation.num_products(), 1);

    let compounds: Vec<_> = equation
        .compounds()
        .iter()
        .map(|compound| (compound.formula(), compound.span(), compound.role()))
        .collect();
    assert_eq!(
        compounds,
        vec![
            ("Cr", Span::new(0, 2), Role::Reactant),
            ("O2", Span::new(5, 7), Role::Reactant),
            ("Cr2O3", Span::new(10, 15), Role::Product),
        ]
    );

    let product = equation.compounds().iter().last().unwrap();
    let elements: Vec<_> = product
        .elements()
        .iter()
        .map(|element| (element.symbol(), element.subscript()))
        .collect();
    assert_eq!(elements, vec![("Cr", 2), ("O", 3)]);
}

#[test]
fn parse_unique_elements_in_first_seen_order() {
    let equation = parse_reaction("NaHCO3 + HCl = NaCl + H2O + CO2").unwrap();
    let elements: Vec<_> = equation.unique_elements().iter().cloned().collect();
    assert_eq!(elements, vec!["Na", "H", "C", "O", "Cl"]);
}

#[test]
fn parse_repeated_symbol() {
    let equation = parse_reaction("CH3COOH = CO2 + CH4").unwrap();
    let acid = equation.compounds().iter().next().unwrap();

    assert_eq!(acid.elements().len(), 6);
    assert_eq!(acid.atoms_of("C"), 2);
    assert_eq!(acid.atoms_of("H"), 4);
    assert_eq!(acid.atoms_of("O"), 2);
    assert_eq!(acid.atoms_of("N"), 0);
}

#[test]
fn parse_multi_digit_subscript() {
    let equation = parse_reaction("C12H22O11 = C + H2O").unwrap();
    let sugar = equation.compounds().iter().next().unwrap();
    assert_eq!(sugar.atoms_of("C"), 12);
    assert_eq!(sugar.atoms_of("H"), 22);
    assert_eq!(sugar.atoms_of("O"), 11);
}

#[test]
fn display_formats() {
    assert_eq!(Element::new("O", 2).to_string(), "O2");
    assert_eq!(Element::new("Cr", 1).to_string(), "Cr");

    let equation = parse_reaction("2H2 + O2 -> 2H2O").unwrap();
    assert_eq!(equation.to_string(), "H2 + O2 = H2O");

    let reaction = balance("H2 + O2 -> H2O").unwrap();
    let compounds: Vec<_> = reaction
        .compounds()
        .iter()
        .map(|compound| compound.to_string())
        .collect();
    assert_eq!(compounds, vec!["2H2", "1O2", "2H2O"]);
}

#[test]
fn yield_symbol_is_leftmost_longest() {
    assert_eq!(find_yield("A <--> B"), Some(Span::new(2, 6)));
    assert_eq!(find_yield("A --> B"), Some(Span::new(2, 5)));
    assert_eq!(find_yield("A -> B"), Some(Span::new(2, 4)));
    assert_eq!(find_yield("A = B"), Some(Span::new(2, 3)));
    assert_eq!(find_yield("A + B"), None);
}

#[test]
fn parse_errors() {
    let malformed_reaction = ["H2 + O2", "= H2O", "H2 + O2 =", ""];
    for formula in &malformed_reaction {
        let error = parse_reaction(formula).unwrap_err();
        assert!(
            matches!(error, parser::Error::MalformedReaction { .. }),
            "{}: {:?}",
            formula,
            error
        );
    }

    let malformed_formula = [
        "Fe + AgNO3 = Fe(NO3)2 + Ag",
        "h2 = H2",
        "Hee = He",
        "H0 = H",
        "H2 + 3 = H2",
        "H2 = H2 = H2",
        "Na.H2O = NaOH",
    ];
    for formula in &malformed_formula {
        let error = parse_reaction(formula).unwrap_err();
        assert!(
            matches!(error, parser::Error::MalformedFormula { .. }),
            "{}: {:?}",
            formula,
            error
        );
    }

    match parse_reaction("H99999999999 = H") {
        Err(parser::Error::MalformedFormula { offset, reason, .. }) => {
            assert_eq!(offset, 1);
            assert!(reason.contains("99999999999"), "{}", reason);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn parenthesis_error_points_at_offending_character() {
    match parse_reaction("Fe + AgNO3 = Fe(NO3)2 + Ag") {
        Err(parser::Error::MalformedFormula { offset, reason, .. }) => {
            assert_eq!(offset, 15);
            assert!(reason.contains('('));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn matrix_negates_products_except_held_out_column() {
    let equation = parse_reaction("C3H8 + O2 = CO2 + H2O").unwrap();
    let system = LinearSystem::from_equation(&equation);

    // rows: C, H, O; columns: C3H8, O2, CO2; b: H2O
    let a = DMatrix::from_row_slice(3, 3, &[3.0, 0.0, -1.0, 8.0, 0.0, 0.0, 0.0, 2.0, -2.0]);
    let b = DVector::from_vec(vec![0.0, 2.0, 1.0]);
    assert_eq!(system.a(), &a);
    assert_eq!(system.b(), &b);
    assert!(system.is_square());

    // H does not appear in CO2, and the entry must not be -0
    assert!(system.a()[(1, 2)].is_sign_positive());
}

#[test]
fn matrix_shape_follows_elements_and_compounds() {
    let equation = parse_reaction("NaHCO3 = Na2CO3 + CO2 + H2O").unwrap();
    let system = LinearSystem::from_equation(&equation);

    assert_eq!(system.num_equations(), 4);
    assert_eq!(system.num_unknowns(), 3);
    assert!(!system.is_square());
}

fn textbook_system() -> LinearSystem {
    // 2x + y - z = 8, -3x - y + 2z = -11, -2x + y + 2z = -3
    LinearSystem::new(
        DMatrix::from_row_slice(3, 3, &[2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]),
        DVector::from_vec(vec![8.0, -11.0, -3.0]),
    )
}

#[test]
fn inverse_solver_regular_system() {
    let solution = InverseSolver::new(textbook_system()).solve().unwrap();

    assert_eq!(solution.method(), Method::Inverse);
    assert_eq!(solution.determinant(), Some(-1.0));
    assert_eq!(solution.fallback(), None);
    assert_eq!(solution.coefficients(), &[2.0, 3.0, 1.0, 1.0]);
}

#[test]
fn elimination_solver_regular_system() {
    let solution = EliminationSolver::new(textbook_system()).solve().unwrap();

    assert_eq!(solution.method(), Method::Elimination);
    assert_eq!(solution.determinant(), Some(-1.0));
    assert_eq!(solution.fallback(), None);
    assert_eq!(solution.coefficients(), &[2.0, 3.0, 1.0, 1.0]);
}

#[test]
fn determinant_recovers_held_out_coefficient() {
    let equation = parse_reaction("Cr + O2 = Cr2O3").unwrap();
    let solution = InverseSolver::new(LinearSystem::from_equation(&equation))
        .solve()
        .unwrap();

    // [x * det, det] is the integer cofactor solution
    let determinant = solution.determinant().unwrap();
    let scaled: Vec<_> = solution
        .coefficients()
        .iter()
        .map(|coefficient| coefficient * determinant)
        .collect();
    assert_eq!(scaled, vec![4.0, 3.0, 2.0]);
}

#[test]
fn fallback_for_non_square_system() {
    let equation = parse_reaction("KClO3 = KCl + O2").unwrap();
    let solution = InverseSolver::new(LinearSystem::from_equation(&equation))
        .solve()
        .unwrap();

    assert_eq!(solution.fallback(), Some(FallbackReason::NonSquare));
    assert_eq!(solution.method(), Method::Qr);
    assert_eq!(solution.determinant(), None);
}

#[test]
fn rank_deficient_system_has_no_unique_solution() {
    // square and singular, then wide
    for formula in &["Na2Cl2 + NaCl = Na3Cl3", "H2 + O2 = H2O + H2O2"] {
        let equation = parse_reaction(formula).unwrap();

        for result in vec![
            InverseSolver::new(LinearSystem::from_equation(&equation)).solve(),
            EliminationSolver::new(LinearSystem::from_equation(&equation)).solve(),
        ] {
            match result {
                Err(solver::Error::UnsolvableSystem { reason }) => {
                    assert!(reason.contains("no unique solution"), "{}: {}", formula, reason)
                }
                other => panic!("{}: unexpected result {:?}", formula, other),
            }
        }
    }
}

#[test]
fn zero_rank_is_unsolvable() {
    let system = LinearSystem::new(DMatrix::zeros(2, 2), DVector::from_vec(vec![1.0, 1.0]));

    for result in vec![
        InverseSolver::new(system.clone()).solve(),
        EliminationSolver::new(system).solve(),
    ] {
        match result {
            Err(solver::Error::UnsolvableSystem { reason }) => {
                assert!(reason.contains("rank 0"), "{}", reason)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}

#[test]
fn inconsistent_elimination_falls_back_then_fails() {
    let equation = parse_reaction("H2 = O2").unwrap();
    let result = EliminationSolver::new(LinearSystem::from_equation(&equation)).solve();
    assert!(matches!(
        result,
        Err(solver::Error::UnsolvableSystem { .. })
    ));
}

#[test]
fn table_lookup_prefers_lowest_terms() {
    let table = RationalTable::default();

    assert_eq!(table.len(), 625);
    assert_eq!(table.lookup(1.0), Some(Fraction::new(1, 1)));
    assert_eq!(table.lookup(0.5), Some(Fraction::new(1, 2)));
    assert_eq!(table.lookup(1.5), Some(Fraction::new(3, 2)));
    assert_eq!(table.lookup(2.0 / 3.0), Some(Fraction::new(2, 3)));
    assert_eq!(table.lookup(25.0), Some(Fraction::new(25, 1)));
    assert_eq!(table.lookup(1.0 / 25.0), Some(Fraction::new(1, 25)));
    assert_eq!(table.lookup(0.0), None);
    assert_eq!(table.lookup(26.0), None);
    assert_eq!(table.lookup(1.0 / 26.0), None);
}

#[test]
fn gcd_is_euclidean() {
    assert_eq!(gcd(12, 18), 6);
    assert_eq!(gcd(18, 12), 6);
    assert_eq!(gcd(7, 13), 1);
    assert_eq!(gcd(0, 9), 9);
    assert_eq!(gcd(9, 0), 9);
}

#[test]
fn simplify_clears_denominators() {
    let table = RationalTable::default();

    assert_eq!(simplify(&[2.0, 1.5, 1.0], &table).unwrap(), vec![4, 3, 2]);
    assert_eq!(
        simplify(&[0.25, 1.25, 0.75, 1.0], &table).unwrap(),
        vec![1, 5, 3, 4]
    );
    assert_eq!(simplify(&[4.0, 2.0, 4.0], &table).unwrap(), vec![2, 1, 2]);
    assert_eq!(simplify(&[1.0, 1.0], &table).unwrap(), vec![1, 1]);
}

#[test]
fn simplify_errors() {
    let table = RationalTable::default();

    let error = simplify(&[1.0, 0.0], &table).unwrap_err();
    assert!(matches!(
        error,
        simplify::Error::UnrepresentableCoefficient { limit: 25, .. }
    ));

    let error = simplify(&[1.0 / 23.0; 16], &table).unwrap_err();
    assert!(matches!(error, simplify::Error::CoefficientOverflow));
}

#[test]
fn assemble_formats_every_coefficient() {
    let reactants = vec!["H2".to_owned(), "O2".to_owned()];
    let products = vec!["H2O".to_owned()];
    assert_eq!(
        assemble(&reactants, &products, &[2, 1, 2]),
        "2H2 + 1O2 = 2H2O"
    );
}

#[test]
fn symbol_validation() {
    let strict = Balancer::<InverseSolver>::new(Options {
        symbols: Some(SymbolTable::builtin()),
        ..Options::default()
    })
    .with_sink(());

    assert!(strict.balance("Cr + O2 = Cr2O3").is_ok());
    match strict.balance("Xx + O2 = XxO2") {
        Err(reaction::Error::UnknownElement { symbol, compound }) => {
            assert_eq!(symbol, "Xx");
            assert_eq!(compound, "Xx");
        }
        other => panic!("unexpected result {:?}", other),
    }

    // without a table any well-formed symbol is accepted
    let reaction = balance_with::<InverseSolver>("Xx + O2 = XxO2").unwrap();
    assert_eq!(reaction.coefficients(), &[1u64, 1, 1][..]);
}

#[test]
fn symbol_table_from_file() {
    let table = SymbolTable::from_csv_file("testcases/symbols.csv").unwrap();
    assert_eq!(table.len(), 10);
    assert!(table.contains("Ne"));
    assert!(!table.contains("Na"));

    assert_eq!(SymbolTable::builtin().len(), 118);
    assert_eq!(SymbolTable::parse_csv(" H , He\nLi,\n").len(), 3);
}

#[derive(Default)]
struct Recorder {
    fallbacks: RefCell<Vec<FallbackReason>>,
    balanced: RefCell<Vec<String>>,
}

impl EventSink for Recorder {
    fn record(&self, event: &Event<'_>) {
        match event {
            Event::Fallback { reason, .. } => self.fallbacks.borrow_mut().push(*reason),
            Event::Balanced { formula } => self.balanced.borrow_mut().push(formula.to_string()),
            _ => (),
        }
    }
}

#[test]
fn fallback_is_reported_to_sink() {
    let balancer = Balancer::<InverseSolver>::new(Options::default()).with_sink(Recorder::default());

    balancer.balance("Cr + O2 = Cr2O3").unwrap();
    assert!(balancer.sink().fallbacks.borrow().is_empty());

    balancer.balance("KClO3 = KCl + O2").unwrap();
    assert_eq!(
        *balancer.sink().fallbacks.borrow(),
        vec![FallbackReason::NonSquare]
    );
    assert_eq!(
        *balancer.sink().balanced.borrow(),
        vec!["4Cr + 3O2 = 2Cr2O3", "2KClO3 = 2KCl + 3O2"]
    );
}

#[test]
fn json_field_names() {
    let reaction = balance("Cr + O2 = Cr2O3").unwrap();
    let json = serde_json::to_value(&reaction).unwrap();

    assert_eq!(json["unbalanced_formula"], "Cr + O2 = Cr2O3");
    assert_eq!(json["balanced_formula"], "4Cr + 3O2 = 2Cr2O3");
    assert_eq!(json["coefficients"], serde_json::json!([4, 3, 2]));
    assert_eq!(json["reactants"], serde_json::json!(["Cr", "O2"]));
    assert_eq!(json["products"], serde_json::json!(["Cr2O3"]));
    assert_eq!(json["unique_elements"], serde_json::json!(["Cr", "O"]));
    assert_eq!(json["compounds"][2]["formula"], "Cr2O3");
    assert_eq!(json["compounds"][2]["coefficient"], 2);
    assert_eq!(json["compounds"][2]["role"], "product");
    assert_eq!(json["compounds"][2]["elements"][0]["symbol"], "Cr");
    assert_eq!(json["compounds"][2]["elements"][0]["subscript"], 2);
    assert_eq!(json["method"], "inverse");
}

#[test]
fn error_chain_lists_every_cause() {
    let error = balance_with::<InverseSolver>("H2 O2 H2O").unwrap_err();

    let line = report::chain(&error);
    assert!(
        line.starts_with("Failed to parse reaction: Malformed reaction 'H2 O2 H2O'"),
        "{}",
        line
    );

    let printed = format!("{:?}", Report::from(error));
    assert!(printed.starts_with("Failed to parse reaction\n\nCaused by:\n  0: Malformed reaction"));
}
