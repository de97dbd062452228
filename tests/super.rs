#[macro_use]
mod common;

#[cfg(test)]
mod _super {
    tests! {
        chained in super is OK
        "B"
        "A"
    }

    tests! {
        call_same_method in super is OK
        "Derived.foo()"
        "Base.foo()"
    }

    tests! {
        constructor in super is OK
        "Derived.init()"
        "Base.init(a, b)"
    }

    tests! {
        in_closure in super is OK
        "A"
    }

    tests! {
        missing_method_err in super is ERR(70)
        "Undefined property 'doesNotExist'."
        "[line 5]"
    }

    tests! {
        no_superclass_err in super is ERR(65)
        "[line 3] Error at 'super': Cannot use 'super' in a class with no superclass."
    }

    tests! {
        at_top_level_err in super is ERR(65)
        "[line 1] Error at 'super': Cannot use 'super' outside of a class."
    }

    tests! {
        without_dot_err in super is ERR(65)
        "[line 5] Error at ';': Expect '.' after 'super'."
    }
}
