#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    tests! {
        counting in for is OK
        "0"
        "1"
        "2"
    }

    tests! {
        scope in for is OK
        "0"
        "global"
    }

    tests! {
        statement_initializer in for is OK
        "1"
        "2"
    }

    // The loop variable is a single binding shared by every iteration.
    tests! {
        closure_in_body in for is OK
        "1"
    }
}
