mod mapping_tests;
