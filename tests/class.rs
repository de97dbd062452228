#[macro_use]
mod common;

#[cfg(test)]
mod _class {
    tests! {
        fields in class is OK
        "The German chocolate cake is delicious!"
    }

    tests! {
        print_class_and_instance in class is OK
        "Foo"
        "Foo instance"
    }

    tests! {
        state in class is OK
        "42"
    }

    tests! {
        fields_shadow_methods in class is OK
        "method"
        "field"
    }

    tests! {
        method_references_class in class is OK
        "Foo instance"
    }

    tests! {
        get_on_noninstance_err in class is ERR(70)
        "Only instances have properties."
        "[line 2]"
    }

    tests! {
        set_on_noninstance_err in class is ERR(70)
        "Only instances have fields."
        "[line 2]"
    }

    tests! {
        undefined_property_err in class is ERR(70)
        "Undefined property 'bar'."
        "[line 4]"
    }
}
