//! Walk through the OO and imperative APIs.

use abacus::imperative::{execute, help};
use abacus::{add, dir, new_abacus, sub, Abacus};

fn main() {
    let mut a = Abacus::default();
    println!("{}", a);
    a.add(5);
    println!("{}", a);
    a.subtract(3);
    println!("{}", a);

    println!("{}", add(7));
    println!("{}", sub(4));

    new_abacus();
    println!("{}", add(1));

    match execute("subtract 10") {
        Ok(Some(abacus)) => println!("{}", abacus),
        Ok(None) => {}
        Err(err) => eprintln!("{}", err),
    }

    println!("{:?}", dir());
    print!("{}", help());
}
