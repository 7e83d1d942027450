use slotwatch_core::query::catalog;

pub fn run() {
    for country in catalog::COUNTRIES {
        println!("{}", country.name);
        for consulate in country.consulates {
            println!("  {}", consulate.name);
        }
    }
    println!();
    println!("Visa types:");
    for visa in catalog::VISA_TYPES {
        println!("  {visa}");
    }
}
