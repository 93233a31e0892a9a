//! The shipped species files must load and cross-resolve

use std::path::Path;

use biodome::needs::NeedKind;
use biodome::species::{load_species_table, SpeciesClass};

#[test]
fn test_shipped_species_load() {
    let table = load_species_table(Path::new("species")).expect("species/ must parse");
    assert_eq!(table.len(), 4);

    let vole = table.get(table.id_of("loam_vole").unwrap());
    assert_eq!(vole.class, SpeciesClass::Animal);
    assert!(!vole.default_behaviors.is_empty());

    // the vole's food need must point at the saltgrass id
    let saltgrass = table.id_of("saltgrass").unwrap();
    assert!(
        vole.declares_need(NeedKind::Food(saltgrass)),
        "loam_vole must reference saltgrass by id"
    );

    let grass = table.get(saltgrass);
    assert_eq!(grass.class, SpeciesClass::Food);
    assert!(grass.base_output > 0.0);
}
