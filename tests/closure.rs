#[macro_use]
mod common;

#[cfg(test)]
mod closure {
    tests! {
        counter in closure is OK
        "1"
        "2"
        "3"
    }

    // The body of showA resolves `a` to the global before the block declares
    // its own; both calls print the same binding.
    tests! {
        shadow_capture in closure is OK
        "global"
        "global"
    }

    tests! {
        close_over_later_variable in closure is OK
        "b"
        "a"
    }

    tests! {
        assign_to_closure in closure is OK
        "local"
        "after f"
        "after f"
        "after g"
    }
}
