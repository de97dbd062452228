#[macro_use]
mod common;

#[cfg(test)]
mod _if {
    tests! {
        truth in if is OK
        "nil is falsy"
        "zero is truthy"
        "empty string is truthy"
        "false is falsy"
        "true is truthy"
    }

    tests! {
        dangling_else in if is OK
        "inner else"
    }
}
