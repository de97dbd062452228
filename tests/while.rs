#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        counting in while is OK
        "0"
        "1"
        "2"
    }

    tests! {
        condition_falsy_skips_body in while is OK
        "done"
    }
}
