#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        scoping in variable is OK
        "inner a"
        "outer b"
        "global c"
        "outer a"
        "outer b"
        "global c"
        "global a"
        "global b"
        "global c"
    }

    tests! {
        uninitialized in variable is OK
        "nil"
    }

    tests! {
        redeclare_global in variable is OK
        "2"
    }

    tests! {
        assign_returns_value in variable is OK
        "2"
        "2"
    }

    tests! {
        undefined_err in variable is ERR(70)
        "Undefined variable 'notDefined'."
        "[line 1]"
    }

    tests! {
        assign_undefined_err in variable is ERR(70)
        "Undefined variable 'unknown'."
        "[line 1]"
    }

    tests! {
        duplicate_local_err in variable is ERR(65)
        "[line 3] Error at 'a': Variable with this name already declared in this scope."
    }

    tests! {
        own_initializer_err in variable is ERR(65)
        "[line 3] Error at 'a': Cannot read local variable in its own initializer."
    }
}
