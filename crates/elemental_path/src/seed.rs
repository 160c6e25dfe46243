//! The fixed element table used to seed an empty catalog.
//!
//! Rows 1 to 7 follow the periodic table. The lanthanides sit in row 9 and the
//! actinides in row 10, both starting at column 4; row 8 stays empty, so the
//! overflow rows never touch period 7.

use elemental_grid::Element;

/// `(atomic number, symbol, primary name, local name, row, column)`.
type SeedRow = (u32, &'static str, &'static str, &'static str, i32, i32);

const SEED_TABLE: &[SeedRow] = &[
    // Period 1
    (1, "H", "Hydrogen", "Vodík", 1, 1),
    (2, "He", "Helium", "Helium", 1, 18),
    // Period 2
    (3, "Li", "Lithium", "Lithium", 2, 1),
    (4, "Be", "Beryllium", "Beryllium", 2, 2),
    (5, "B", "Boron", "Bor", 2, 13),
    (6, "C", "Carbon", "Uhlík", 2, 14),
    (7, "N", "Nitrogen", "Dusík", 2, 15),
    (8, "O", "Oxygen", "Kyslík", 2, 16),
    (9, "F", "Fluorine", "Fluor", 2, 17),
    (10, "Ne", "Neon", "Neon", 2, 18),
    // Period 3
    (11, "Na", "Sodium", "Sodík", 3, 1),
    (12, "Mg", "Magnesium", "Hořčík", 3, 2),
    (13, "Al", "Aluminium", "Hliník", 3, 13),
    (14, "Si", "Silicon", "Křemík", 3, 14),
    (15, "P", "Phosphorus", "Fosfor", 3, 15),
    (16, "S", "Sulfur", "Síra", 3, 16),
    (17, "Cl", "Chlorine", "Chlor", 3, 17),
    (18, "Ar", "Argon", "Argon", 3, 18),
    // Period 4
    (19, "K", "Potassium", "Draslík", 4, 1),
    (20, "Ca", "Calcium", "Vápník", 4, 2),
    (21, "Sc", "Scandium", "Skandium", 4, 3),
    (22, "Ti", "Titanium", "Titan", 4, 4),
    (23, "V", "Vanadium", "Vanad", 4, 5),
    (24, "Cr", "Chromium", "Chrom", 4, 6),
    (25, "Mn", "Manganese", "Mangan", 4, 7),
    (26, "Fe", "Iron", "Železo", 4, 8),
    (27, "Co", "Cobalt", "Kobalt", 4, 9),
    (28, "Ni", "Nickel", "Nikl", 4, 10),
    (29, "Cu", "Copper", "Měď", 4, 11),
    (30, "Zn", "Zinc", "Zinek", 4, 12),
    (31, "Ga", "Gallium", "Gallium", 4, 13),
    (32, "Ge", "Germanium", "Germanium", 4, 14),
    (33, "As", "Arsenic", "Arsen", 4, 15),
    (34, "Se", "Selenium", "Selen", 4, 16),
    (35, "Br", "Bromine", "Brom", 4, 17),
    (36, "Kr", "Krypton", "Krypton", 4, 18),
    // Period 5
    (37, "Rb", "Rubidium", "Rubidium", 5, 1),
    (38, "Sr", "Strontium", "Stroncium", 5, 2),
    (39, "Y", "Yttrium", "Yttrium", 5, 3),
    (40, "Zr", "Zirconium", "Zirkonium", 5, 4),
    (41, "Nb", "Niobium", "Niob", 5, 5),
    (42, "Mo", "Molybdenum", "Molybden", 5, 6),
    (43, "Tc", "Technetium", "Technecium", 5, 7),
    (44, "Ru", "Ruthenium", "Ruthenium", 5, 8),
    (45, "Rh", "Rhodium", "Rhodium", 5, 9),
    (46, "Pd", "Palladium", "Palladium", 5, 10),
    (47, "Ag", "Silver", "Stříbro", 5, 11),
    (48, "Cd", "Cadmium", "Kadmium", 5, 12),
    (49, "In", "Indium", "Indium", 5, 13),
    (50, "Sn", "Tin", "Cín", 5, 14),
    (51, "Sb", "Antimony", "Antimon", 5, 15),
    (52, "Te", "Tellurium", "Tellur", 5, 16),
    (53, "I", "Iodine", "Jod", 5, 17),
    (54, "Xe", "Xenon", "Xenon", 5, 18),
    // Period 6
    (55, "Cs", "Caesium", "Cesium", 6, 1),
    (56, "Ba", "Barium", "Baryum", 6, 2),
    (72, "Hf", "Hafnium", "Hafnium", 6, 4),
    (73, "Ta", "Tantalum", "Tantal", 6, 5),
    (74, "W", "Tungsten", "Wolfram", 6, 6),
    (75, "Re", "Rhenium", "Rhenium", 6, 7),
    (76, "Os", "Osmium", "Osmium", 6, 8),
    (77, "Ir", "Iridium", "Iridium", 6, 9),
    (78, "Pt", "Platinum", "Platina", 6, 10),
    (79, "Au", "Gold", "Zlato", 6, 11),
    (80, "Hg", "Mercury", "Rtuť", 6, 12),
    (81, "Tl", "Thallium", "Thallium", 6, 13),
    (82, "Pb", "Lead", "Olovo", 6, 14),
    (83, "Bi", "Bismuth", "Bismut", 6, 15),
    (84, "Po", "Polonium", "Polonium", 6, 16),
    (85, "At", "Astatine", "Astat", 6, 17),
    (86, "Rn", "Radon", "Radon", 6, 18),
    // Period 7
    (87, "Fr", "Francium", "Francium", 7, 1),
    (88, "Ra", "Radium", "Radium", 7, 2),
    (104, "Rf", "Rutherfordium", "Rutherfordium", 7, 4),
    (105, "Db", "Dubnium", "Dubnium", 7, 5),
    (106, "Sg", "Seaborgium", "Seaborgium", 7, 6),
    (107, "Bh", "Bohrium", "Bohrium", 7, 7),
    (108, "Hs", "Hassium", "Hassium", 7, 8),
    (109, "Mt", "Meitnerium", "Meitnerium", 7, 9),
    (110, "Ds", "Darmstadtium", "Darmstadtium", 7, 10),
    (111, "Rg", "Roentgenium", "Roentgenium", 7, 11),
    (112, "Cn", "Copernicium", "Kopernicium", 7, 12),
    (113, "Nh", "Nihonium", "Nihonium", 7, 13),
    (114, "Fl", "Flerovium", "Flerovium", 7, 14),
    (115, "Mc", "Moscovium", "Moscovium", 7, 15),
    (116, "Lv", "Livermorium", "Livermorium", 7, 16),
    (117, "Ts", "Tennessine", "Tennessin", 7, 17),
    (118, "Og", "Oganesson", "Oganesson", 7, 18),
    // Lanthanides
    (57, "La", "Lanthanum", "Lanthan", 9, 4),
    (58, "Ce", "Cerium", "Cer", 9, 5),
    (59, "Pr", "Praseodymium", "Praseodym", 9, 6),
    (60, "Nd", "Neodymium", "Neodym", 9, 7),
    (61, "Pm", "Promethium", "Promethium", 9, 8),
    (62, "Sm", "Samarium", "Samarium", 9, 9),
    (63, "Eu", "Europium", "Europium", 9, 10),
    (64, "Gd", "Gadolinium", "Gadolinium", 9, 11),
    (65, "Tb", "Terbium", "Terbium", 9, 12),
    (66, "Dy", "Dysprosium", "Dysprosium", 9, 13),
    (67, "Ho", "Holmium", "Holmium", 9, 14),
    (68, "Er", "Erbium", "Erbium", 9, 15),
    (69, "Tm", "Thulium", "Thulium", 9, 16),
    (70, "Yb", "Ytterbium", "Ytterbium", 9, 17),
    (71, "Lu", "Lutetium", "Lutecium", 9, 18),
    // Actinides
    (89, "Ac", "Actinium", "Aktinium", 10, 4),
    (90, "Th", "Thorium", "Thorium", 10, 5),
    (91, "Pa", "Protactinium", "Protaktinium", 10, 6),
    (92, "U", "Uranium", "Uran", 10, 7),
    (93, "Np", "Neptunium", "Neptunium", 10, 8),
    (94, "Pu", "Plutonium", "Plutonium", 10, 9),
    (95, "Am", "Americium", "Americium", 10, 10),
    (96, "Cm", "Curium", "Curium", 10, 11),
    (97, "Bk", "Berkelium", "Berkelium", 10, 12),
    (98, "Cf", "Californium", "Kalifornium", 10, 13),
    (99, "Es", "Einsteinium", "Einsteinium", 10, 14),
    (100, "Fm", "Fermium", "Fermium", 10, 15),
    (101, "Md", "Mendelevium", "Mendelevium", 10, 16),
    (102, "No", "Nobelium", "Nobelium", 10, 17),
    (103, "Lr", "Lawrencium", "Lawrencium", 10, 18),
];

/// The seed table as domain elements, in table order.
pub fn seed_elements() -> Vec<Element> {
    SEED_TABLE
        .iter()
        .map(|&(number, symbol, primary, local, row, col)| {
            Element::new(number, symbol.into(), primary.into(), Some(local.into()), row, col)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_grid::{ElementGrid, OVERFLOW_FIRST_COL};

    #[test]
    fn test_seed_covers_all_118_elements() {
        let mut numbers: Vec<u32> = seed_elements().iter().map(|e| *e.atomic_number()).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=118).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_passes_grid_validation() {
        let grid = ElementGrid::new(seed_elements()).expect("seed table is consistent");
        assert_eq!(grid.len(), 118);
        assert_eq!(grid.lookup("kyslík").map(|e| e.symbol().as_str()), Some("O"));
    }

    #[test]
    fn test_overflow_rows_start_at_column_four() {
        let overflow: Vec<Element> = seed_elements().into_iter().filter(|e| e.is_overflow_series()).collect();
        assert_eq!(overflow.len(), 30);
        assert!(overflow.iter().all(|e| *e.col() >= OVERFLOW_FIRST_COL));
        assert!(seed_elements().iter().all(|e| *e.row() != 8));
    }
}
